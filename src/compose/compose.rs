use std::rc::Rc;

/// A shared single-argument function, the unit of composition.
pub type Func<T> = Rc<dyn Fn(T) -> T>;

/// Compose single-argument functions from right to left.
///
/// `compose(vec![f, g, h])` behaves like `|x| f(g(h(x)))`. With no functions the
/// result is the identity, so an "empty" input (`None`, `T::default()`) comes
/// back unchanged. With exactly one function that same function is returned.
///
/// # Examples
///
/// ```
/// use reducto::compose::{compose, Func};
/// use std::rc::Rc;
///
/// let double: Func<i32> = Rc::new(|x: i32| x * 2);
/// let square: Func<i32> = Rc::new(|x: i32| x * x);
///
/// assert_eq!(compose(vec![square.clone(), double.clone()])(5), 100);
/// assert_eq!(compose(vec![double, square])(5), 50);
/// assert_eq!(compose::<i32>(vec![])(7), 7);
/// ```
pub fn compose<T: 'static>(mut funcs: Vec<Func<T>>) -> Func<T> {
    match funcs.len() {
        0 => {
            let identity: Func<T> = Rc::new(|x: T| x);
            identity
        }
        1 => funcs.remove(0),
        _ => {
            let chain: Func<T> = Rc::new(move |x: T| funcs.iter().rev().fold(x, |acc, f| f(acc)));
            chain
        }
    }
}

/// Compose functions from right to left around a rightmost `seed` that may take
/// any input, including a tuple of several arguments.
///
/// ```
/// use reducto::compose::{compose_seeded, Func};
/// use std::rc::Rc;
///
/// let square: Func<i32> = Rc::new(|x: i32| x * x);
/// let add = |(a, b): (i32, i32)| a + b;
///
/// assert_eq!(compose_seeded(vec![square], add)((1, 2)), 9);
/// ```
pub fn compose_seeded<A, T, F>(funcs: Vec<Func<T>>, seed: F) -> Rc<dyn Fn(A) -> T>
where
    A: 'static,
    T: 'static,
    F: Fn(A) -> T + 'static,
{
    let rest = compose(funcs);
    Rc::new(move |args: A| rest(seed(args)))
}
