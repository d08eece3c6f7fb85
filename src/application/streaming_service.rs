// Streaming dashboard service - Progressive loading, one section per message
use crate::application::dashboard_service::{DashboardControls, DashboardService};
use crate::domain::dashboard::{Section, SectionId};
use crate::domain::error::load_error_detail;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize)]
pub struct SectionSkeleton {
    pub id: SectionId,
    pub heading: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton {
        title: String,
        sections: Vec<SectionSkeleton>,
    },
    Section {
        section: Section,
    },
    Complete {
        sections: usize,
        duration_ms: i64,
    },
    Error {
        message: String,
        detail: String,
    },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    dashboard_service: DashboardService,
}

impl StreamingDashboardService {
    pub fn new(dashboard_service: DashboardService) -> Self {
        Self { dashboard_service }
    }

    pub async fn stream_dashboard(&self, controls: DashboardControls) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(16);
        let service = self.dashboard_service.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();
            let labels = service.labels();

            // 1. Skeleton first so the client can lay out every section
            let skeleton = StreamMessage::Skeleton {
                title: labels.title.clone(),
                sections: SectionId::ORDER
                    .iter()
                    .map(|&id| SectionSkeleton {
                        id,
                        heading: labels.heading(id).to_string(),
                    })
                    .collect(),
            };
            if tx.send(skeleton).await.is_err() {
                return;
            }

            // 2. Load failure ends the stream after a single error
            let table = match service.table().await {
                Ok(table) => table,
                Err(e) => {
                    let message = service.labels().load_failure.clone();
                    let detail = load_error_detail(&e);
                    let _ = tx.send(StreamMessage::Error { message, detail }).await;
                    return;
                }
            };

            // 3. Sections in display order
            for &id in SectionId::ORDER.iter() {
                let section = service.build_section(id, &table, &controls);
                if tx.send(StreamMessage::Section { section }).await.is_err() {
                    tracing::debug!("Dashboard stream receiver dropped before section {:?}", id);
                    return;
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            let _ = tx
                .send(StreamMessage::Complete {
                    sections: SectionId::ORDER.len(),
                    duration_ms,
                })
                .await;
        });

        rx
    }
}
