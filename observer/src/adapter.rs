use std::rc::Rc;

use crate::args::{Arguments, Leading};
use crate::subject::Subject;

/// Something that can be connected to a `Subject<Args>` as a free callable.
///
/// Implemented for every `Fn` whose parameters are a leading prefix of `Args`. `Marker` only
/// disambiguates the impls and is inferred; closures need their parameter types annotated.
/// Callables may be re-entered by a nested `notify`, so state they mutate lives behind a
/// `Cell` or `RefCell`.
pub trait Callback<Args, Marker>: 'static {
    /// Number of published values this callable consumes
    const ARITY: usize;
    fn call(&self, args: &Args);
}

/// A method-like callable bound to an instance of `I`, e.g. `Counter::record` for
/// `fn record(&self, value: i32)`.
pub trait Method<I, Args, Marker>: 'static {
    const ARITY: usize;
    fn call(&self, instance: &I, args: &Args);
}

macro_rules! callback_impls {
    ($($arity:literal => ($($param:ident),*);)*) => {$(
        impl<F, R, Args, $($param),*> Callback<Args, fn($($param),*) -> R> for F
        where
            F: Fn($($param),*) -> R + 'static,
            Args: Leading<($($param,)*)>,
        {
            const ARITY: usize = $arity;

            #[allow(non_snake_case)]
            fn call(&self, args: &Args) {
                let ($($param,)*) = <Args as Leading<($($param,)*)>>::leading(args);
                (self)($($param),*);
            }
        }

        impl<F, I, R, Args, $($param),*> Method<I, Args, fn(&I, $($param),*) -> R> for F
        where
            F: Fn(&I, $($param),*) -> R + 'static,
            Args: Leading<($($param,)*)>,
        {
            const ARITY: usize = $arity;

            #[allow(non_snake_case)]
            fn call(&self, instance: &I, args: &Args) {
                let ($($param,)*) = <Args as Leading<($($param,)*)>>::leading(args);
                (self)(instance, $($param),*);
            }
        }
    )*};
}

callback_impls! {
    0 => ();
    1 => (A0);
    2 => (A0, A1);
    3 => (A0, A1, A2);
    4 => (A0, A1, A2, A3);
    5 => (A0, A1, A2, A3, A4);
    6 => (A0, A1, A2, A3, A4, A5);
}

/// The closed set of connection targets. Each variant records the declared arity of its target.
pub(crate) enum Adapter<Args> {
    /// A free function or closure
    Callable { arity: usize, call: Box<dyn Fn(&Args)> },
    /// A method bound to a weakly held instance. `call` reports false when the instance is gone.
    Method { arity: usize, call: Box<dyn Fn(&Args) -> bool> },
    /// Forwards the leading values to another subject, which is held weakly. `forward` reports
    /// false when that subject is gone.
    Relay { arity: usize, forward: Box<dyn Fn(&Args) -> bool> },
}

impl<Args: 'static> Adapter<Args> {
    pub(crate) fn callable<M, F>(callback: F) -> Self
    where F: Callback<Args, M> {
        Adapter::Callable { arity: F::ARITY, call: Box::new(move |args| callback.call(args)) }
    }

    pub(crate) fn method<I, M, F>(instance: &Rc<I>, method: F) -> Self
    where
        I: 'static,
        F: Method<I, Args, M>,
    {
        let instance = Rc::downgrade(instance);
        Adapter::Method {
            arity: F::ARITY,
            call: Box::new(move |args| {
                let Some(instance) = instance.upgrade() else { return false };
                method.call(&instance, args);
                true
            }),
        }
    }

    /// Relay into a subject publishing `To`, a leading prefix of `Args` (possibly all of it)
    pub(crate) fn relay<To>(target: &Subject<To>) -> Self
    where
        Args: Leading<To>,
        To: Arguments + 'static,
    {
        let target = target.downgrade();
        Adapter::Relay {
            arity: To::ARITY,
            forward: Box::new(move |args| {
                let Some(target) = target.upgrade() else { return false };
                target.notify(args.leading());
                true
            }),
        }
    }

    pub(crate) fn arity(&self) -> usize {
        match self {
            Adapter::Callable { arity, .. } | Adapter::Method { arity, .. } | Adapter::Relay { arity, .. } => *arity,
        }
    }

    /// Deliver `args` to the target. Returns false if the target no longer exists.
    pub(crate) fn invoke(&self, args: &Args) -> bool {
        match self {
            Adapter::Callable { call, .. } => {
                call(args);
                true
            }
            Adapter::Method { call, .. } => call(args),
            Adapter::Relay { forward, .. } => forward(args),
        }
    }
}
