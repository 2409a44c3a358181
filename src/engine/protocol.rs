use std::sync::mpsc::Sender;

use crate::model::advice::AdviceResponse;

pub enum AdviceCommand {
    Request {
        id: u64,
        callback: Box<dyn AdviceCallback>,
    },
}

/// Receives the outcome of one advice request. Exactly one of the two
/// methods is called, once, on the advice worker thread.
pub trait AdviceCallback: Send + 'static {
    fn on_advice_received(self: Box<Self>, advice: String);

    fn on_error(self: Box<Self>, error: String);

    fn deliver(self: Box<Self>, response: AdviceResponse) {
        match response {
            AdviceResponse::Advice(text) => self.on_advice_received(text),
            AdviceResponse::Error(message) => self.on_error(message),
        }
    }
}

/// Hands the result to whoever owns the receiver, typically a render loop
/// that polls with `try_recv` once per frame.
impl AdviceCallback for Sender<AdviceResponse> {
    fn on_advice_received(self: Box<Self>, advice: String) {
        // receiver gone means nobody is waiting for the answer any more
        let _ = self.send(AdviceResponse::Advice(advice));
    }

    fn on_error(self: Box<Self>, error: String) {
        let _ = self.send(AdviceResponse::Error(error));
    }
}

/// Adapts a closure taking the tagged response.
pub struct FnCallback<F>(pub F);

impl<F> FnCallback<F>
where
    F: FnOnce(AdviceResponse) + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> AdviceCallback for FnCallback<F>
where
    F: FnOnce(AdviceResponse) + Send + 'static,
{
    fn on_advice_received(self: Box<Self>, advice: String) {
        let FnCallback(f) = *self;
        f(AdviceResponse::Advice(advice))
    }

    fn on_error(self: Box<Self>, error: String) {
        let FnCallback(f) = *self;
        f(AdviceResponse::Error(error))
    }
}
