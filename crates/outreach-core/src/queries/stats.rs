//! Campaign statistics over operations rows

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ActiveState, EmailStatus, ProfileOperations, ResponseStatus};

/// Aggregate engagement of every recipient enrolled in a campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignStats {
    pub campaign_id: String,
    pub total_recipients: i64,
    pub active: i64,
    pub paused: i64,
    pub unsubscribed: i64,
    pub emails_sent: i64,
    pub opens: i64,
    pub clicks: i64,
    pub replies: i64,
    pub email_status_counts: BTreeMap<EmailStatus, i64>,
    pub response_status_counts: BTreeMap<ResponseStatus, i64>,
}

impl CampaignStats {
    pub fn empty(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            ..Default::default()
        }
    }

    /// Fold one recipient's operations row into the totals
    pub fn add(&mut self, ops: &ProfileOperations) {
        self.total_recipients += 1;
        match ops.is_active {
            ActiveState::Active => self.active += 1,
            ActiveState::Paused => self.paused += 1,
            ActiveState::Unsubscribed => self.unsubscribed += 1,
        }
        self.emails_sent += ops.emails_sent_count;
        self.opens += ops.open_count;
        self.clicks += ops.click_count;
        self.replies += ops.reply_count;
        *self.email_status_counts.entry(ops.email_status).or_insert(0) += 1;
        *self
            .response_status_counts
            .entry(ops.response_status)
            .or_insert(0) += 1;
    }

    pub fn from_operations<'a, I>(campaign_id: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ProfileOperations>,
    {
        let mut stats = Self::empty(campaign_id);
        for ops in rows {
            stats.add(ops);
        }
        stats
    }

    pub fn open_rate(&self) -> f64 {
        rate(self.opens, self.emails_sent)
    }

    pub fn click_rate(&self) -> f64 {
        rate(self.clicks, self.emails_sent)
    }

    pub fn reply_rate(&self) -> f64 {
        rate(self.replies, self.emails_sent)
    }
}

fn rate(count: i64, sent: i64) -> f64 {
    if sent <= 0 {
        0.0
    } else {
        count as f64 / sent as f64
    }
}
