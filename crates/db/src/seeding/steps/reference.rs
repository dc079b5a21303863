//! Reference data: channels and their formats, markets, industries, KPIs.
//!
//! Every step here is truncate-and-reinsert. Ids are derived from codes, so
//! a reseed writes the same ids back.

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, Set};

use cmis_core::catalog::{CHANNELS, INDUSTRIES, KPIS, MARKETS};
use cmis_core::identity::IdentityRegistry;
use cmis_core::seeding::{EntityKind, SeedError, StepManifest, StepSummary};

use crate::entities::{channel_formats, channels, industries, kpis, markets};
use crate::seeding::context::SeedContext;
use crate::seeding::step::{SeedStep, insert_all};

/// Id of a seeded channel.
#[must_use]
pub fn channel_id(code: &str) -> uuid::Uuid {
    IdentityRegistry::derive("channel", code)
}

/// Id of a seeded channel format.
#[must_use]
pub fn channel_format_id(channel: &str, format: &str) -> uuid::Uuid {
    IdentityRegistry::derive("channel-format", &format!("{channel}:{format}"))
}

/// Channels and the formats each one offers.
pub struct ChannelsStep;

#[async_trait]
impl SeedStep for ChannelsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("channels", &[EntityKind::Channel, EntityKind::ChannelFormat])
            .truncating(&[EntityKind::Channel])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let step = self.manifest().name;
        let now = ctx.timestamp();

        let rows: Vec<_> = CHANNELS
            .iter()
            .map(|channel| channels::ActiveModel {
                id: Set(channel_id(channel.code)),
                code: Set(channel.code.to_string()),
                name: Set(channel.name.to_string()),
                kind: Set(channel.kind.to_string()),
                created_at: Set(now),
            })
            .collect();
        let mut summary = insert_all(txn, step, rows).await?;

        let formats: Vec<_> = CHANNELS
            .iter()
            .flat_map(|channel| {
                channel.formats.iter().map(move |format| channel_formats::ActiveModel {
                    id: Set(channel_format_id(channel.code, format.code)),
                    channel_id: Set(channel_id(channel.code)),
                    code: Set(format.code.to_string()),
                    name: Set(format.name.to_string()),
                    ratio: Set(format.ratio.to_string()),
                    max_duration_secs: Set(format.max_duration_secs),
                    created_at: Set(now),
                })
            })
            .collect();
        summary += insert_all(txn, step, formats).await?;

        Ok(summary)
    }
}

/// Geographic markets.
pub struct MarketsStep;

#[async_trait]
impl SeedStep for MarketsStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("markets", &[EntityKind::Market]).truncating(&[EntityKind::Market])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        _ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let rows: Vec<_> = MARKETS
            .iter()
            .map(|market| markets::ActiveModel {
                id: Set(IdentityRegistry::derive("market", market.code)),
                code: Set(market.code.to_string()),
                name: Set(market.name.to_string()),
                name_ar: Set(market.name_ar.to_string()),
                currency: Set(market.currency.to_string()),
                language: Set(market.language.to_string()),
            })
            .collect();
        insert_all(txn, self.manifest().name, rows).await
    }
}

/// Industry classifications.
pub struct IndustriesStep;

#[async_trait]
impl SeedStep for IndustriesStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("industries", &[EntityKind::Industry])
            .truncating(&[EntityKind::Industry])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        _ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let rows: Vec<_> = INDUSTRIES
            .iter()
            .map(|industry| industries::ActiveModel {
                id: Set(IdentityRegistry::derive("industry", industry.code)),
                code: Set(industry.code.to_string()),
                name: Set(industry.name.to_string()),
            })
            .collect();
        insert_all(txn, self.manifest().name, rows).await
    }
}

/// KPI definitions.
pub struct KpisStep;

#[async_trait]
impl SeedStep for KpisStep {
    fn manifest(&self) -> StepManifest {
        StepManifest::new("kpis", &[EntityKind::Kpi]).truncating(&[EntityKind::Kpi])
    }

    async fn run(
        &self,
        txn: &DatabaseTransaction,
        _ctx: &SeedContext,
    ) -> Result<StepSummary, SeedError> {
        let rows: Vec<_> = KPIS
            .iter()
            .map(|kpi| kpis::ActiveModel {
                id: Set(IdentityRegistry::derive("kpi", kpi.code)),
                code: Set(kpi.code.to_string()),
                name: Set(kpi.name.to_string()),
                unit: Set(kpi.unit.to_string()),
                higher_is_better: Set(kpi.higher_is_better),
            })
            .collect();
        insert_all(txn, self.manifest().name, rows).await
    }
}
