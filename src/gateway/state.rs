use std::sync::Arc;

use crate::service::Concierge;

#[derive(Clone)]
pub struct HandlerState {
    pub concierge: Arc<Concierge>,
}

impl HandlerState {
    pub fn new(concierge: Arc<Concierge>) -> Self {
        Self { concierge }
    }
}
