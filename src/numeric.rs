//! Numeric helpers behind the game rules.
//!
//! Release attempts are decided by [`is_prime`] and rename suffixes are taken
//! from [`fibonacci`].

/// Returns true when `n` is a prime number.
///
/// Anything below 2, negative numbers included, is not prime.
///
/// # Examples
/// ```
/// use my_pokemon::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(97));
/// assert!(!is_prime(1));
/// assert!(!is_prime(-7));
/// ```
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d: i64 = 2;
    // d <= n / d is d * d <= n without the overflow near i64::MAX.
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Returns the `index`-th Fibonacci number, with `fibonacci(0) == 0` and
/// `fibonacci(1) == 1`.
///
/// Returns `None` once the value no longer fits in a `u128`, which first
/// happens at index 187.
///
/// # Examples
/// ```
/// use my_pokemon::fibonacci;
///
/// assert_eq!(fibonacci(10), Some(55));
/// assert_eq!(fibonacci(187), None);
/// ```
pub fn fibonacci(index: u32) -> Option<u128> {
    // `next` is None once fib(i + 1) has overflowed.
    let (mut current, mut next): (u128, Option<u128>) = (0, Some(1));
    for _ in 0..index {
        let following = next?;
        next = current.checked_add(following);
        current = following;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers_are_not_prime() {
        for n in [-100, -2, -1, 0, 1] {
            assert!(!is_prime(n), "{n} should not be prime");
        }
    }

    #[test]
    fn known_primes() {
        for n in [2, 3, 5, 7, 11, 13, 89, 97] {
            assert!(is_prime(n), "{n} should be prime");
        }
    }

    #[test]
    fn known_composites() {
        for n in [4, 6, 8, 9, 25, 49, 91, 99] {
            assert!(!is_prime(n), "{n} should not be prime");
        }
    }

    #[test]
    fn primes_below_one_hundred() {
        let primes: Vec<i64> = (0..100).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes.len(), 25);
        assert_eq!(primes.first(), Some(&2));
        assert_eq!(primes.last(), Some(&97));
    }

    #[test]
    fn large_values_do_not_overflow() {
        assert!(is_prime(2_147_483_647));
        assert!(!is_prime(i64::MAX));
    }

    #[test]
    fn fibonacci_base_cases() {
        assert_eq!(fibonacci(0), Some(0));
        assert_eq!(fibonacci(1), Some(1));
        assert_eq!(fibonacci(2), Some(1));
        assert_eq!(fibonacci(3), Some(2));
        assert_eq!(fibonacci(4), Some(3));
        assert_eq!(fibonacci(5), Some(5));
        assert_eq!(fibonacci(10), Some(55));
    }

    #[test]
    fn fibonacci_past_u64() {
        assert_eq!(fibonacci(93), Some(12_200_160_415_121_876_738));
        assert_eq!(fibonacci(94), Some(19_740_274_219_868_223_167));
    }

    #[test]
    fn fibonacci_u128_boundary() {
        assert_eq!(
            fibonacci(186),
            Some(332_825_110_087_067_562_321_196_029_789_634_457_848)
        );
        assert_eq!(fibonacci(187), None);
        assert_eq!(fibonacci(u32::MAX), None);
    }
}
