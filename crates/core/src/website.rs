//! The fixed set of website profiles the automation worker knows how
//! to drive.
//!
//! Profile ids are part of the wire contract with both the browser form
//! (the `website` multipart field) and the worker's `--website` flag.

/// A supported target website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Website {
    /// 일진홀딩스 visit-request automation.
    IljinHoldings,
    /// IP 168 ITSM system automation.
    Ip168Itsm,
}

/// All supported profiles, in display order.
pub const ALL_WEBSITES: &[Website] = &[Website::IljinHoldings, Website::Ip168Itsm];

impl Website {
    /// Parse a profile from its wire id. Returns `None` for unknown ids.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "iljin_holdings" => Some(Self::IljinHoldings),
            "ip_168_itsm" => Some(Self::Ip168Itsm),
            _ => None,
        }
    }

    /// The wire id passed to the worker's `--website` flag.
    pub fn id(&self) -> &'static str {
        match self {
            Self::IljinHoldings => "iljin_holdings",
            Self::Ip168Itsm => "ip_168_itsm",
        }
    }

    /// Human-readable name shown in the UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::IljinHoldings => "일진홀딩스",
            Self::Ip168Itsm => "IP 168 ITSM",
        }
    }
}
