//! Ticket operations.

use url::Url;

use super::{WhdClient, READ_TIMEOUT, WRITE_TIMEOUT};
use crate::error::WhdError;
use crate::models::{ListQuery, Ticket};

/// Browser path that opens a ticket in the web UI.
const TICKET_VIEW_PATH: &str = "/helpdesk/WebObjects/Helpdesk.woa/wa/TicketActions/view";

impl WhdClient {
    /// Gets full details of a single ticket.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::NotFound` if the ticket doesn't exist.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let ticket = client.get_ticket(1234).await?;
    /// println!("Subject: {}", ticket.display_subject());
    /// ```
    pub async fn get_ticket(&self, id: u64) -> Result<Ticket, WhdError> {
        self.get_json(&format!("Ticket/{}", id), &[], READ_TIMEOUT)
            .await
            .map_err(|e| match e {
                WhdError::NotFound { .. } => WhdError::not_found(format!("ticket {}", id)),
                e => e,
            })
    }

    /// Searches tickets matching a qualifier.
    ///
    /// Sample qualifiers:
    /// - all tickets including deleted: `((deleted = null) or (deleted = 0) or (deleted = 1))`
    /// - tickets in location ATL: `(location.locationName = 'ATL')`
    /// - open tickets: `(statustype.statusTypeName = 'Open')`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let query = ListQuery::new("(statustype.statusTypeName = 'Open')").with_limit(50);
    /// let tickets = client.get_tickets(&query).await?;
    /// ```
    pub async fn get_tickets(&self, query: &ListQuery) -> Result<Vec<Ticket>, WhdError> {
        self.get_json("Tickets", &query.to_query_pairs(), WRITE_TIMEOUT)
            .await
    }

    /// Creates the ticket if it has no id, otherwise updates it.
    ///
    /// Returns the ticket id reported by the server.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::Rejected` if the server explains why it refused
    /// the ticket.
    pub async fn create_update_ticket(&self, ticket: &Ticket) -> Result<u64, WhdError> {
        let payload = ticket.to_payload()?;
        let id = self.save_entity("Ticket", "Ticket", ticket.id, &payload).await?;

        tracing::info!(ticket_id = id, created = ticket.is_new(), "Ticket saved");
        Ok(id)
    }

    /// Returns the web UI link for a ticket.
    pub fn ticket_web_url(&self, id: u64) -> Result<String, WhdError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, TICKET_VIEW_PATH))
            .map_err(|e| WhdError::invalid_config(format!("invalid base URL: {}", e)))?;
        url.query_pairs_mut().append_pair("ticket", &id.to_string());
        Ok(url.into())
    }
}
