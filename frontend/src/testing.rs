//! Doublures pour les tests natifs (pas de navigateur).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::{ready, Future};
use std::rc::Rc;

use crate::api::{ApiClient, ApiRequest, RawResponse, Transport};
use crate::storage::{MemoryStore, TokenStore};

/// Transport scripté : rejoue les réponses dans l'ordre et garde les requêtes.
#[derive(Clone, Debug, Default)]
pub struct FakeTransport {
    replies: Rc<RefCell<VecDeque<Result<RawResponse, String>>>>,
    sent: Rc<RefCell<Vec<ApiRequest>>>,
}

impl FakeTransport {
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(RawResponse { status, body: body.into() }));
        self
    }

    pub fn fail(self, reason: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(reason.into()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<RawResponse, String>> {
        self.sent.borrow_mut().push(request);
        let next = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("aucune réponse prévue".into()));
        ready(next)
    }
}

pub fn client(transport: &FakeTransport, store: &MemoryStore) -> ApiClient<FakeTransport, MemoryStore> {
    ApiClient::new(transport.clone(), TokenStore::new(store.clone()))
}
