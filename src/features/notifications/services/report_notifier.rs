use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::features::categories::Category;
use crate::features::notifications::models::{DeletedReportEvent, ReportEvent, ServerEvent};
use crate::features::notifications::registry::Notifier;
use crate::features::users::UserRepository;

/// Routes report events to the users who care about them
pub struct ReportNotifier {
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ReportNotifier {
    pub fn new(users: Arc<dyn UserRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { users, notifier }
    }

    pub async fn report_added(&self, event: ReportEvent) {
        let category = event.category;
        self.fan_out(category, None, ServerEvent::ReportAdded(event))
            .await;
    }

    pub async fn report_updated(&self, event: ReportEvent) {
        let category = event.category;
        self.fan_out(category, None, ServerEvent::ReportUpdated(event))
            .await;
    }

    /// Status changes also reach the citizen who filed the report
    pub async fn status_updated(&self, event: ReportEvent) {
        let category = event.category;
        let citizen = event.citizen_id;
        self.fan_out(category, Some(citizen), ServerEvent::ReportUpdated(event))
            .await;
    }

    pub async fn report_deleted(&self, event: DeletedReportEvent) {
        let category = event.category;
        self.fan_out(category, None, ServerEvent::ReportDeleted(event))
            .await;
    }

    /// Returns how many users had a live connection and got the event
    async fn fan_out(&self, category: Category, extra: Option<Uuid>, event: ServerEvent) -> usize {
        let mut recipients: HashSet<Uuid> = match self.users.list_authorities(category).await {
            Ok(authorities) => authorities.into_iter().map(|u| u.id).collect(),
            Err(e) => {
                tracing::warn!(
                    "Failed to resolve authorities for '{}', skipping them: {:?}",
                    category,
                    e
                );
                HashSet::new()
            }
        };
        recipients.extend(extra);

        let delivered = recipients
            .into_iter()
            .filter(|user_id| self.notifier.notify(*user_id, event.clone()))
            .count();

        tracing::debug!(
            "Event for category '{}' delivered to {} online user(s)",
            category,
            delivered
        );
        delivered
    }
}
