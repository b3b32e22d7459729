//! # App Services
//!
//! Small stateful services shared by every screen of a client: theme,
//! onboarding, the busy overlay and the signed-in session. They are plain
//! values the client constructs once and passes around; nothing here is
//! global.
//!
//! State that a view renders is held in an [`Observable`], so a client can
//! subscribe and redraw on change instead of polling.

use crate::error::Result;
use crate::identity::{CurrentUser, IdentityProvider};
use crate::prefs::{Preferences, ThemeMode};
use crate::store::backend::StorageBackend;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct ObservableInner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<(Subscription, Callback<T>)>>,
    next_id: AtomicU64,
}

/// A value with change notification. Clones share the value and subscribers.
///
/// Subscribers run synchronously inside [`Observable::set`], after the new
/// value is visible to [`Observable::get`]. A subscriber must not subscribe or
/// unsubscribe on the same observable.
pub struct Observable<T> {
    inner: Arc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(ObservableInner {
                value: Mutex::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.inner.value).clone()
    }

    pub fn set(&self, value: T) {
        *lock(&self.inner.value) = value.clone();
        self.notify(&value);
    }

    /// Applies `f` to the current value and publishes the result.
    ///
    /// The read and the write happen under one lock, so concurrent updates
    /// never overwrite each other.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> T {
        let next = {
            let mut value = lock(&self.inner.value);
            let next = f(&value);
            *value = next.clone();
            next
        };
        self.notify(&next);
        next
    }

    fn notify(&self, value: &T) {
        for (_, callback) in lock(&self.inner.subscribers).iter() {
            callback(value);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = Subscription(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.subscribers).push((id, Box::new(callback)));
        id
    }

    /// Returns whether the subscription was still registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut subscribers = lock(&self.inner.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != subscription);
        subscribers.len() != before
    }
}

/// Concrete scheme a view renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

pub struct ThemeService<B: StorageBackend> {
    prefs: Preferences<B>,
    mode: Observable<ThemeMode>,
}

impl<B: StorageBackend> ThemeService<B> {
    pub fn new(prefs: Preferences<B>) -> Self {
        let mode = Observable::new(prefs.theme_mode());
        Self { prefs, mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    pub fn observe(&self) -> &Observable<ThemeMode> {
        &self.mode
    }

    /// Persists `mode`, then publishes it. A failed write changes nothing.
    pub fn set_mode(&self, mode: ThemeMode) -> Result<()> {
        self.prefs.set_theme_mode(mode)?;
        self.mode.set(mode);
        Ok(())
    }

    /// system → light → dark → light.
    pub fn toggle(&self) -> Result<ThemeMode> {
        let next = match self.mode() {
            ThemeMode::System | ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        };
        self.set_mode(next)?;
        Ok(next)
    }

    /// Resolves the mode against the platform scheme, light when unknown.
    pub fn effective_scheme(&self, platform: Option<ColorScheme>) -> ColorScheme {
        match self.mode() {
            ThemeMode::Light => ColorScheme::Light,
            ThemeMode::Dark => ColorScheme::Dark,
            ThemeMode::System => platform.unwrap_or(ColorScheme::Light),
        }
    }
}

pub struct OnboardingService<B: StorageBackend> {
    prefs: Preferences<B>,
    completed: Observable<bool>,
}

impl<B: StorageBackend> OnboardingService<B> {
    pub fn new(prefs: Preferences<B>) -> Self {
        let completed = Observable::new(prefs.onboarding_completed());
        Self { prefs, completed }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    pub fn complete(&self) -> Result<()> {
        self.prefs.mark_onboarding_completed()?;
        self.completed.set(true);
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        self.prefs.reset_onboarding()?;
        self.completed.set(false);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyState {
    pub depth: usize,
    pub message: Option<String>,
}

impl BusyState {
    pub fn is_busy(&self) -> bool {
        self.depth > 0
    }
}

/// Loading overlay state. Nested [`BusyIndicator::show`] calls stack; the
/// overlay clears when the last [`BusyGuard`] drops.
#[derive(Clone)]
pub struct BusyIndicator {
    state: Observable<BusyState>,
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self {
            state: Observable::new(BusyState::default()),
        }
    }

    pub fn show(&self, message: impl Into<String>) -> BusyGuard {
        let message = message.into();
        self.state.update(|state| BusyState {
            depth: state.depth + 1,
            message: Some(message),
        });
        BusyGuard {
            state: self.state.clone(),
        }
    }

    pub fn state(&self) -> BusyState {
        self.state.get()
    }

    pub fn observe(&self) -> &Observable<BusyState> {
        &self.state
    }
}

#[must_use = "the overlay hides as soon as the guard is dropped"]
pub struct BusyGuard {
    state: Observable<BusyState>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.update(|state| {
            let depth = state.depth.saturating_sub(1);
            BusyState {
                depth,
                message: if depth == 0 { None } else { state.message.clone() },
            }
        });
    }
}

/// The signed-in user, kept in step with an [`IdentityProvider`].
pub struct SessionService<P: IdentityProvider> {
    provider: P,
    user: Observable<Option<CurrentUser>>,
}

impl<P: IdentityProvider> SessionService<P> {
    pub fn new(provider: P) -> Self {
        let user = Observable::new(provider.current_user());
        Self { provider, user }
    }

    pub fn user(&self) -> Option<CurrentUser> {
        self.user.get()
    }

    pub fn observe(&self) -> &Observable<Option<CurrentUser>> {
        &self.user
    }

    pub fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> Result<CurrentUser> {
        let user = self.provider.sign_up(email, password, display_name)?;
        self.user.set(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<CurrentUser> {
        let user = self.provider.sign_in(email, password)?;
        self.user.set(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.provider.sign_out()?;
        self.user.set(None);
        Ok(())
    }

    pub fn update_display_name(&mut self, display_name: &str) -> Result<CurrentUser> {
        let user = self.provider.update_display_name(display_name)?;
        self.user.set(Some(user.clone()));
        Ok(user)
    }
}
