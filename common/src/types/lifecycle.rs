use crate::types::order_status::StatusBucket;
use serde::{Deserialize, Serialize};

/// The five-stage lifecycle the progress bars are drawn against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleStage {
    Created,
    Pending,
    Prepared,
    Sent,
    Received,
}

impl LifecycleStage {
    pub const SEQUENCE: [LifecycleStage; 5] = [
        LifecycleStage::Created,
        LifecycleStage::Pending,
        LifecycleStage::Prepared,
        LifecycleStage::Sent,
        LifecycleStage::Received,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LifecycleStage::Created => "Pedido Creado",
            LifecycleStage::Pending => "Pedido Pendiente",
            LifecycleStage::Prepared => "Pedido Preparado",
            LifecycleStage::Sent => "Pedido Enviado",
            LifecycleStage::Received => "Pedido Recibido",
        }
    }

    /// Looks up a stage by its label, ignoring case and surrounding blanks.
    pub fn from_label(label: &str) -> Option<LifecycleStage> {
        let label = label.trim();
        Self::SEQUENCE
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(label))
    }

    /// Stage shown for a raw backend status, through its bucket.
    /// Cancelled orders have none; unrecognised statuses count as created.
    pub fn from_backend(raw: Option<&str>) -> Option<LifecycleStage> {
        Self::shown_for(StatusBucket::classify(raw))
    }

    /// Like [`LifecycleStage::for_bucket`], but `Unknown` shows as `Created`.
    pub fn shown_for(bucket: StatusBucket) -> Option<LifecycleStage> {
        match bucket {
            StatusBucket::Unknown => Some(LifecycleStage::Created),
            bucket => Self::for_bucket(bucket),
        }
    }

    pub fn for_bucket(bucket: StatusBucket) -> Option<LifecycleStage> {
        match bucket {
            StatusBucket::Pending => Some(LifecycleStage::Pending),
            StatusBucket::Preparing => Some(LifecycleStage::Prepared),
            StatusBucket::Dispatched | StatusBucket::EnRoute => Some(LifecycleStage::Sent),
            StatusBucket::Delivered => Some(LifecycleStage::Received),
            StatusBucket::Cancelled | StatusBucket::Unknown => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn progress_percent(self) -> u8 {
        ((self.index() + 1) * 100 / Self::SEQUENCE.len()) as u8
    }
}

/// Completion (0-100) of a lifecycle label; `0` when the label is unknown.
pub fn progress_percent(label: &str) -> u8 {
    LifecycleStage::from_label(label).map_or(0, LifecycleStage::progress_percent)
}

impl StatusBucket {
    /// Completion (0-100) of a bucket, through its lifecycle stage.
    pub fn progress_percent(self) -> u8 {
        LifecycleStage::for_bucket(self).map_or(0, LifecycleStage::progress_percent)
    }
}
