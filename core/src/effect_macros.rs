//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers describe async work, timers
//! and cancellable timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use shield_point_core::async_effect;
///
/// async_effect! {
///     let answer = recommender.recommend(question, catalog).await;
///     Some(AppAction::AdvisorAnswered { answer })
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

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use shield_point_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(2),
///     action: AppAction::ScanResolved { session: 1 }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Delay` registered under a cancellation identifier
///
/// # Example
///
/// ```rust,ignore
/// use shield_point_core::cancellable_delay;
/// use std::time::Duration;
///
/// cancellable_delay! {
///     id: "kiosk-timer",
///     duration: Duration::from_millis(3500),
///     action: AppAction::DispenseFinished { session: 2 }
/// }
/// ```
#[macro_export]
macro_rules! cancellable_delay {
    (
        id: $id:expr,
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $crate::effect::EffectId::new($id),
            effect: ::std::boxed::Box::new($crate::delay! {
                duration: $duration,
                action: $action
            }),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        AsyncResult { value: i32 },
        TimeoutExpired,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::TimeoutExpired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_delay_macro() {
        let effect = cancellable_delay! {
            id: "timer",
            duration: Duration::from_millis(10),
            action: TestAction::TimeoutExpired
        };

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id.as_str(), "timer");
                assert!(matches!(
                    *effect,
                    Effect::Delay { duration, .. } if duration == Duration::from_millis(10)
                ));
            },
            _ => unreachable!("macro always builds a cancellable effect"),
        }
    }
}
