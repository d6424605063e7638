//! Argument lists are plain tuples: a `Subject<(i32, String, bool)>` publishes three values.
//! A callback may accept any leading prefix of them; the trailing values are dropped.

/// A tuple whose leading elements can be cloned out as the smaller tuple `P`.
///
/// Implemented for every prefix of every tuple up to six elements, including the empty prefix
/// and the full tuple. There is no impl for a "prefix" longer than the tuple itself, which is
/// what rejects a callback that wants more values than a subject publishes.
pub trait Leading<P> {
    fn leading(&self) -> P;
}

/// An argument list with a known number of values
pub trait Arguments: 'static {
    const ARITY: usize;
}

macro_rules! leading {
    ($(($($all:ident),*) => ($($idx:tt $take:ident),*);)*) => {$(
        impl<$($all),*> Leading<($($take,)*)> for ($($all,)*)
        where $($take: Clone),*
        {
            fn leading(&self) -> ($($take,)*) { ($(self.$idx.clone(),)*) }
        }
    )*};
}

leading! {
    () => ();

    (A) => ();
    (A) => (0 A);

    (A, B) => ();
    (A, B) => (0 A);
    (A, B) => (0 A, 1 B);

    (A, B, C) => ();
    (A, B, C) => (0 A);
    (A, B, C) => (0 A, 1 B);
    (A, B, C) => (0 A, 1 B, 2 C);

    (A, B, C, D) => ();
    (A, B, C, D) => (0 A);
    (A, B, C, D) => (0 A, 1 B);
    (A, B, C, D) => (0 A, 1 B, 2 C);
    (A, B, C, D) => (0 A, 1 B, 2 C, 3 D);

    (A, B, C, D, E) => ();
    (A, B, C, D, E) => (0 A);
    (A, B, C, D, E) => (0 A, 1 B);
    (A, B, C, D, E) => (0 A, 1 B, 2 C);
    (A, B, C, D, E) => (0 A, 1 B, 2 C, 3 D);
    (A, B, C, D, E) => (0 A, 1 B, 2 C, 3 D, 4 E);

    (A, B, C, D, E, F) => ();
    (A, B, C, D, E, F) => (0 A);
    (A, B, C, D, E, F) => (0 A, 1 B);
    (A, B, C, D, E, F) => (0 A, 1 B, 2 C);
    (A, B, C, D, E, F) => (0 A, 1 B, 2 C, 3 D);
    (A, B, C, D, E, F) => (0 A, 1 B, 2 C, 3 D, 4 E);
    (A, B, C, D, E, F) => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
}

macro_rules! arguments {
    ($($arity:literal => ($($t:ident),*);)*) => {$(
        impl<$($t: 'static),*> Arguments for ($($t,)*) {
            const ARITY: usize = $arity;
        }
    )*};
}

arguments! {
    0 => ();
    1 => (A);
    2 => (A, B);
    3 => (A, B, C);
    4 => (A, B, C, D);
    5 => (A, B, C, D, E);
    6 => (A, B, C, D, E, F);
}
