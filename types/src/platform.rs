//! Thread-safety bounds that relax on single-threaded wasm hosts.
//!
//! Native hosts run fetch callbacks on a tokio worker, so anything crossing
//! into a request task must be `Send`. Browser hosts run everything on the
//! page's one thread and their handles (`web_sys::Document`, closures) are
//! never `Send`.

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    pub trait MaybeSend: Send {}
    impl<T: Send + ?Sized> MaybeSend for T {}

    pub trait MaybeSync: Sync {}
    impl<T: Sync + ?Sized> MaybeSync for T {}

    /// A boxed one-shot callback registered for a later notification.
    pub type BoxedCallback = Box<dyn FnOnce() + Send + 'static>;
}

#[cfg(target_arch = "wasm32")]
mod imp {
    pub trait MaybeSend {}
    impl<T: ?Sized> MaybeSend for T {}

    pub trait MaybeSync {}
    impl<T: ?Sized> MaybeSync for T {}

    /// A boxed one-shot callback registered for a later notification.
    pub type BoxedCallback = Box<dyn FnOnce() + 'static>;
}

pub use imp::{BoxedCallback, MaybeSend, MaybeSync};
