use std::{
    sync::{
        Arc,
        Weak,
        RwLock,
        RwLockReadGuard,
        RwLockWriteGuard,
        LockResult
    },
    fmt
};

/// Owning handle to a value the scene and its observers both look at.
#[derive(Default)]
pub struct Shared<T: ?Sized> {
    inner: Arc<RwLock<T>>
}

/// Non-owning handle. Observers keep these so a source can be dropped
/// by its owner without the observer noticing until the next snapshot.
pub struct SharedWeak<T: ?Sized> {
    inner: Weak<RwLock<T>>
}

impl<T> Shared<T> {
    pub fn new() -> Self
    where T: Default {
        Self {
            inner: Arc::new(RwLock::new(T::default()))
        }
    }

    pub fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner)
        }
    }

    pub fn downgrade(&self) -> SharedWeak<T> {
        SharedWeak {
            inner: Arc::downgrade(&self.inner)
        }
    }

    pub fn read(&self) -> LockResult<RwLockReadGuard<T>> {
        self.inner.read()
    }

    pub fn write(&self) -> LockResult<RwLockWriteGuard<T>> {
        self.inner.write()
    }
}

impl<T> SharedWeak<T> {
    pub fn upgrade(&self) -> Option<Shared<T>> {
        self.inner.upgrade().map(|inner| Shared { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<T> Clone for SharedWeak<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner)
        }
    }
}

#[macro_export]
macro_rules! shared_access {
    (mut $secured_obj:expr $(, $err:expr)?) => {
        $crate::shared_access![@_action write, $secured_obj, $($err)?]
    };

    ($secured_obj:expr $(, $err:expr)?) => {
        $crate::shared_access![@_action read, $secured_obj, $($err)?]
    };

    (@_action $action:ident, $secured_obj:expr, $($err_handler:expr)?) => {
        match $secured_obj.$action() {
            Ok(secured_obj) => secured_obj,
            Err(err) => return $crate::shared_access![@_unwrap_err err $(, $err_handler)?]
        }
    };

    (@_unwrap_err $err:expr) => {{
        log::error! {
            target: "shared",
            "unable to access shared object: {}", $err
        };

        Err($crate::Error::Sync($err.to_string()).into())
    }};
    (@_unwrap_err $err:expr, $handler:expr) => {{
        $crate::shared::handle_access_error($err, $handler)
    }};
}

pub fn handle_access_error<E, R, H: FnOnce(E) -> R>(err: E, handler: H) -> R {
    handler(err)
}

impl<T> From<T> for Shared<T> {
    fn from(from: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(from))
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        shared_access![self, |err| write!(f, "<unable to debug display shared object> [{}]", err)]
            .fmt(f)
    }
}

impl<T> fmt::Debug for SharedWeak<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_alive() {
            write!(f, "SharedWeak(alive)")
        } else {
            write!(f, "SharedWeak(dropped)")
        }
    }
}
