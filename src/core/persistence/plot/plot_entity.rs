use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::persistence::impl_sql_code;

/// Sales lifecycle of a plot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlotStatus {
    Available,
    /// Booking advance received; the plot is held for one client.
    Advance,
    Sold,
}

impl PlotStatus {
    pub fn from_code<S: AsRef<str>>(code: S) -> Option<Self> {
        match code.as_ref().to_uppercase().as_str() {
            "AVAILABLE" => Some(Self::Available),
            "ADVANCE" => Some(Self::Advance),
            "SOLD" => Some(Self::Sold),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Advance => "ADVANCE",
            Self::Sold => "SOLD",
        }
    }

    /// Transitions allowed through the status endpoint. `SOLD` is terminal there;
    /// only an approved sell request relists a sold plot.
    pub fn can_transition_to(&self, next: PlotStatus) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Advance)
                | (Self::Available, Self::Sold)
                | (Self::Advance, Self::Sold)
                | (Self::Advance, Self::Available)
        )
    }
}

impl_sql_code!(PlotStatus);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotEntity {
    pub id: String,
    pub project_id: String,
    pub plot_number: String,
    pub title: Option<String>,
    pub area_sq_yards: f64,
    /// Whole currency units.
    pub price: i64,
    pub facing: Option<String>,
    pub status: PlotStatus,
    pub owner_id: Option<String>,
    pub image_url: Option<String>,
    pub sold_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlotEntity {
    pub fn relist(&mut self, price: i64) {
        self.status = PlotStatus::Available;
        self.owner_id = None;
        self.sold_at = None;
        self.price = price;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sold_is_terminal() {
        assert!(!PlotStatus::Sold.can_transition_to(PlotStatus::Available));
        assert!(!PlotStatus::Sold.can_transition_to(PlotStatus::Advance));
        assert!(!PlotStatus::Sold.can_transition_to(PlotStatus::Sold));
    }

    #[test]
    fn advance_can_be_cancelled_or_completed() {
        assert!(PlotStatus::Advance.can_transition_to(PlotStatus::Available));
        assert!(PlotStatus::Advance.can_transition_to(PlotStatus::Sold));
        assert!(!PlotStatus::Advance.can_transition_to(PlotStatus::Advance));
    }

    #[test]
    fn available_moves_forward_only() {
        assert!(PlotStatus::Available.can_transition_to(PlotStatus::Advance));
        assert!(PlotStatus::Available.can_transition_to(PlotStatus::Sold));
        assert!(!PlotStatus::Available.can_transition_to(PlotStatus::Available));
    }
}
