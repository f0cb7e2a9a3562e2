use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// GPT employee personas served under `/gpt/{agent}`.
///
/// Each persona is a thin controller: it acknowledges the task and, for a
/// few personas, triggers an outbound relay. CRIS, the external manager,
/// decides which persona to call; that routing logic lives outside this
/// service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    Cris,
    Ava,
    VinceAssist,
    LeadAi,
    ConvertAi,
    DemandAi,
    ScheduleAi,
    VerifyAi,
    FundingAi,
    DocBot,
    RevenueAi,
    YtScribe,
    Qa,
    Compliance,
    AdsAi,
    OpsAi,
    CsAi,
    PricingAi,
    PartnerAi,
    HiringAi,
    FinanceAi,
    AuditAi,
    LabsAi,
}

impl AgentId {
    /// Every persona, in route-registration order.
    pub const ALL: [AgentId; 23] = [
        Self::Cris,
        Self::Ava,
        Self::VinceAssist,
        Self::LeadAi,
        Self::ConvertAi,
        Self::DemandAi,
        Self::ScheduleAi,
        Self::VerifyAi,
        Self::FundingAi,
        Self::DocBot,
        Self::RevenueAi,
        Self::YtScribe,
        Self::Qa,
        Self::Compliance,
        Self::AdsAi,
        Self::OpsAi,
        Self::CsAi,
        Self::PricingAi,
        Self::PartnerAi,
        Self::HiringAi,
        Self::FinanceAi,
        Self::AuditAi,
        Self::LabsAi,
    ];

    /// URL path segment for this persona.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Cris => "cris",
            Self::Ava => "ava",
            Self::VinceAssist => "vinceassist",
            Self::LeadAi => "leadai",
            Self::ConvertAi => "convertai",
            Self::DemandAi => "demandai",
            Self::ScheduleAi => "scheduleai",
            Self::VerifyAi => "verifyai",
            Self::FundingAi => "fundingai",
            Self::DocBot => "docbot",
            Self::RevenueAi => "revenueai",
            Self::YtScribe => "ytscribe",
            Self::Qa => "qa",
            Self::Compliance => "compliance",
            Self::AdsAi => "adsai",
            Self::OpsAi => "opsai",
            Self::CsAi => "csai",
            Self::PricingAi => "pricingai",
            Self::PartnerAi => "partnerai",
            Self::HiringAi => "hiringai",
            Self::FinanceAi => "financeai",
            Self::AuditAi => "auditai",
            Self::LabsAi => "labsai",
        }
    }

    /// Display name used in agent replies.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cris => "CRIS",
            Self::Ava => "AVA",
            Self::VinceAssist => "VINCEASSIST",
            Self::LeadAi => "LEADAI",
            Self::ConvertAi => "CONVERTAI",
            Self::DemandAi => "DEMANDAI",
            Self::ScheduleAi => "SCHEDULEAI",
            Self::VerifyAi => "VERIFYAI",
            Self::FundingAi => "FUNDINGAI",
            Self::DocBot => "DOCBOT",
            Self::RevenueAi => "REVENUEAI",
            Self::YtScribe => "YTSCRIBE",
            Self::Qa => "QA",
            Self::Compliance => "COMPLIANCE",
            Self::AdsAi => "ADSAI",
            Self::OpsAi => "OPSAI",
            Self::CsAi => "CSAI",
            Self::PricingAi => "PRICINGAI",
            Self::PartnerAi => "PARTNERAI",
            Self::HiringAi => "HIRINGAI",
            Self::FinanceAi => "FINANCEAI",
            Self::AuditAi => "AUDITAI",
            Self::LabsAi => "LABSAI",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for AgentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|agent| agent.slug() == s)
            .ok_or_else(|| CoreError::unknown_agent(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for agent in AgentId::ALL {
            let parsed: AgentId = agent.slug().parse().expect("slug should parse");
            assert_eq!(parsed, agent);
        }
    }

    #[test]
    fn test_unknown_slug_rejected() {
        let err = "mysteryai".parse::<AgentId>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownAgent(_)));
        assert_eq!(err.to_string(), "Unknown agent: mysteryai");
    }

    #[test]
    fn test_display_name_matches_slug() {
        for agent in AgentId::ALL {
            assert_eq!(agent.display_name().to_ascii_lowercase(), agent.slug());
        }
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&AgentId::VinceAssist).unwrap();
        assert_eq!(json, "\"vinceassist\"");

        let parsed: AgentId = serde_json::from_str("\"leadai\"").unwrap();
        assert_eq!(parsed, AgentId::LeadAi);
    }

    #[test]
    fn test_all_is_exhaustive_and_distinct() {
        let mut slugs: Vec<&str> = AgentId::ALL.iter().map(|a| a.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), AgentId::ALL.len());
    }
}
