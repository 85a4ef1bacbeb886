use serde::Serialize;
use uuid::Uuid;

use crate::models::Investment;

/// Investment lifecycle events pushed to connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "investment_created")]
    InvestmentCreated(Investment),

    #[serde(rename = "investment_matured")]
    InvestmentMatured(Investment),

    #[serde(rename = "investment_liquidated")]
    InvestmentLiquidated(Investment),
}

impl WsMessage {
    /// Owner of the investment the event is about.
    pub fn user_id(&self) -> Uuid {
        match self {
            WsMessage::InvestmentCreated(inv)
            | WsMessage::InvestmentMatured(inv)
            | WsMessage::InvestmentLiquidated(inv) => inv.user_id,
        }
    }
}
