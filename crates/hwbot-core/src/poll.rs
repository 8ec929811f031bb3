//! One fetch -> validate -> translate -> notify pass.

use serde_json::Value;

use crate::{
    domain::{ChatId, Cursor},
    ports::{HomeworkSource, MessagingPort},
    validate::{check_response, current_date},
    verdict::VerdictTable,
    Error, Result,
};

/// Borrowed collaborators of a single poll cycle.
pub struct PollContext<'a> {
    pub source: &'a dyn HomeworkSource,
    pub messenger: &'a dyn MessagingPort,
    pub chat_id: ChatId,
    pub verdicts: &'a VerdictTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOutcome {
    /// Cursor for the next cycle.
    pub cursor: Cursor,
    /// Notifications delivered during this cycle.
    pub sent: usize,
}

/// Run one cycle starting at `cursor` (or `now` when the cursor is unset).
///
/// Any failure aborts the cycle; notifications sent before the failure are
/// not rolled back and the caller keeps its previous cursor.
pub async fn poll_once(ctx: &PollContext<'_>, cursor: Cursor, now: Cursor) -> Result<PollOutcome> {
    let from_date = if cursor.is_unset() { now } else { cursor };
    let endpoint = ctx.source.endpoint();

    let reply = ctx.source.fetch(from_date).await?;
    if !reply.is_ok() {
        return Err(Error::UnexpectedStatusCode {
            endpoint: endpoint.to_string(),
            code: reply.status,
        });
    }

    let response: Value = serde_json::from_str(&reply.body).map_err(Error::InvalidPayload)?;
    let homeworks = check_response(&response)?;
    tracing::debug!(endpoint, from_date = from_date.0, "response received");
    tracing::debug!(count = homeworks.len(), "homework events in response");

    let mut sent = 0usize;
    for raw in homeworks {
        let message = ctx.verdicts.parse_status(raw)?;
        tracing::debug!("{message}");
        ctx.messenger.send_text(ctx.chat_id, &message).await?;
        sent += 1;
    }

    Ok(PollOutcome {
        cursor: current_date(&response).unwrap_or(cursor),
        sent,
    })
}
