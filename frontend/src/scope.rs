//! Durée de vie des tâches asynchrones d'un écran.
//!
//! Une réponse qui arrive après le démontage ne doit toucher à aucun état :
//! chaque future lancée par un écran passe par son `ViewScope`, qui l'annule
//! au démontage.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use futures::FutureExt;
use yew::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct ViewScope {
    closed: Rc<Cell<bool>>,
    handles: Rc<RefCell<Vec<AbortHandle>>>,
}

impl PartialEq for ViewScope {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.closed, &other.closed)
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        !self.closed.get()
    }

    /// `None` si la portée est close avant la fin de `fut`.
    pub fn guard<F: Future>(&self, fut: F) -> impl Future<Output = Option<F::Output>> {
        let (handle, registration) = AbortHandle::new_pair();
        if self.closed.get() {
            handle.abort();
        } else {
            let mut handles = self.handles.borrow_mut();
            handles.retain(|h| !h.is_aborted());
            handles.push(handle);
        }
        Abortable::new(fut, registration).map(Result::ok)
    }

    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        wasm_bindgen_futures::spawn_local(self.guard(fut).map(|_| ()));
    }

    pub fn close(&self) {
        self.closed.set(true);
        for handle in self.handles.borrow_mut().drain(..) {
            handle.abort();
        }
    }
}

/// État d'un chargement d'écran.
#[derive(Clone, Debug, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

/// Portée liée au composant courant, close à son démontage.
#[hook]
pub fn use_view_scope() -> ViewScope {
    let scope = (*use_memo((), |_| ViewScope::new())).clone();
    {
        let scope = scope.clone();
        use_effect_with((), move |_| move || scope.close());
    }
    scope
}

#[cfg(test)]
mod tests {
    use futures::channel::oneshot;
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn completes_while_alive() {
        let scope = ViewScope::new();
        assert_eq!(block_on(scope.guard(async { 5 })), Some(5));
    }

    #[test]
    fn late_response_is_dropped_after_close() {
        let scope = ViewScope::new();
        let (tx, rx) = oneshot::channel::<&str>();
        let guarded = scope.guard(rx);

        scope.close();
        tx.send("profil").unwrap();
        assert_eq!(block_on(guarded), None);
    }

    #[test]
    fn futures_started_after_close_never_run() {
        let scope = ViewScope::new();
        scope.close();

        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let out = block_on(scope.guard(async move { flag.set(true) }));

        assert_eq!(out, None);
        assert!(!ran.get());
        assert!(!scope.is_alive());
    }

    #[test]
    fn clones_share_the_same_lifetime() {
        let scope = ViewScope::new();
        let copy = scope.clone();
        copy.close();
        assert!(!scope.is_alive());
        assert_eq!(scope, copy);
    }
}
