use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum BirdError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Never surfaced to callers; the scheduler falls back to a timer.
    #[error("no native animation frame scheduler")]
    SchedulerUnavailable,

    #[error("host call failed: {0}")]
    Js(String),
}

impl BirdError {
    pub(crate) fn js(value: JsValue) -> Self {
        BirdError::Js(format!("{:?}", value))
    }
}

impl From<BirdError> for JsValue {
    fn from(e: BirdError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

pub type Result<T, E = BirdError> = std::result::Result<T, E>;
