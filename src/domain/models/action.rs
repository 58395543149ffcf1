use super::ExchangeId;
use super::PanelSize;

pub struct QueryRequest {
    pub id: ExchangeId,
    pub question: String,
    pub token: Option<String>,
}

pub enum Action {
    FetchHistory(String),
    Logout(),
    SavePanelSize(PanelSize),
    SubmitQuery(QueryRequest),
}
