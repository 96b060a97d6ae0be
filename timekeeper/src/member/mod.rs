use std::future::Future;

use crate::aop::Timer;

/// A named member of a type, as handed to [`Timer::decorate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Member<F, V = ()> {
    Method(F),
    Field(V),
}

impl<F, V> Member<F, V> {
    pub fn is_method(&self) -> bool {
        matches!(self, Member::Method(_))
    }
}

/// A function value paired with the timer that measures it.
///
/// Arguments travel as a single value, so a method taking a receiver and
/// one parameter is wrapped as `Fn((&Self, P)) -> R`:
///
/// ```
/// use timekeeper::Timer;
///
/// struct Counter { base: u32 }
///
/// impl Counter {
///     fn add(&self, n: u32) -> u32 { self.base + n }
/// }
///
/// let add = Timer::with_callback(|_ms| ())
///     .wrap("add", |(this, n): (&Counter, u32)| this.add(n));
/// assert_eq!(add.call((&Counter { base: 2 }, 3)), 5);
/// ```
#[derive(Clone, Debug)]
pub struct Timed<F> {
    name: &'static str,
    timer: Timer,
    op: F,
}

impl<F> Timed<F> {
    pub(crate) fn new(name: &'static str, timer: Timer, op: F) -> Self {
        Self { name, timer, op }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn call<A, R>(&self, args: A) -> R
    where
        F: Fn(A) -> R,
    {
        self.timer.run(self.name, || (self.op)(args))
    }

    pub fn call_fallible<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
    {
        self.timer.run_fallible(self.name, || (self.op)(args))
    }

    pub async fn call_async<A, Fut>(&self, args: A) -> Fut::Output
    where
        F: Fn(A) -> Fut,
        Fut: Future,
    {
        self.timer.run_async(self.name, (self.op)(args)).await
    }

    pub async fn call_async_fallible<A, Fut, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.timer.run_async_fallible(self.name, (self.op)(args)).await
    }
}
