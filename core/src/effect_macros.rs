//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use pawfetch_core::async_effect;
///
/// let catalog = env.catalog.clone();
/// async_effect! {
///     let result = catalog.list_breeds().await;
///     Some(AppAction::BreedsLoaded { result })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
