//! Unread mention summaries

use chat_core::Snowflake;
use tracing::instrument;

use crate::dto::MentionSummaryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Mention service
pub struct MentionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MentionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Per-room unread counts for the user, most recent first
    #[instrument(skip(self))]
    pub async fn unread(&self, user_id: Snowflake) -> ServiceResult<Vec<MentionSummaryResponse>> {
        let summary = self.ctx.mention_repo().unread_summary(user_id).await?;
        Ok(summary.into_iter().map(MentionSummaryResponse::from).collect())
    }
}
