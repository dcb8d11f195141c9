//! Symbolicators for tests.
//!
//! `GatedSymbolicator` holds every call open until the test releases it,
//! which is how the tests order a result after a later selection change.

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, BoxFuture};
use std::sync::{Arc, Mutex};
use tracescope_runtime::{SymbolicateError, Symbolicator};
use tracescope_types::Address;

type Reply = Result<Vec<String>, SymbolicateError>;

struct PendingCall {
    addresses: Vec<Address>,
    reply: Option<oneshot::Sender<Reply>>,
}

/// Records every request and completes each one only when told to.
#[derive(Clone, Default)]
pub struct GatedSymbolicator {
    calls: Arc<Mutex<Vec<PendingCall>>>,
}

impl GatedSymbolicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address batches of every call so far, in call order.
    pub fn requests(&self) -> Vec<Vec<Address>> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|call| call.addresses.clone()).collect()
    }

    /// Complete call `n` with `sym_<addr>` names.
    pub fn release(&self, n: usize) {
        let names = self.requests()[n]
            .iter()
            .map(|address| symbol_name(*address))
            .collect();
        self.reply(n, Ok(names));
    }

    /// Complete call `n` with exactly `names`.
    pub fn release_with(&self, n: usize, names: &[&str]) {
        self.reply(n, Ok(names.iter().map(|name| name.to_string()).collect()));
    }

    pub fn fail(&self, n: usize) {
        self.reply(n, Err(SymbolicateError::Failed("gated failure".to_string())));
    }

    pub fn release_all(&self) {
        for n in 0..self.requests().len() {
            self.release(n);
        }
    }

    fn reply(&self, n: usize, reply: Reply) {
        let mut calls = self.calls.lock().unwrap();
        if let Some(sender) = calls[n].reply.take() {
            let _ = sender.send(reply);
        }
    }
}

impl Symbolicator for GatedSymbolicator {
    fn symbolicate(&self, addresses: Vec<Address>) -> BoxFuture<'static, Reply> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(PendingCall {
            addresses,
            reply: Some(tx),
        });

        rx.map(|reply| {
            reply.unwrap_or_else(|_| Err(SymbolicateError::Unavailable("gate dropped".to_string())))
        })
        .boxed()
    }
}

/// Resolves every address immediately to `sym_<addr>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingSymbolicator;

impl Symbolicator for NamingSymbolicator {
    fn symbolicate(&self, addresses: Vec<Address>) -> BoxFuture<'static, Reply> {
        let names = addresses.into_iter().map(symbol_name).collect();
        future::ready(Ok(names)).boxed()
    }
}

pub fn symbol_name(address: Address) -> String {
    format!("sym_{:x}", address.value())
}
