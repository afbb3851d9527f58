/// Step counter that wraps at a fixed period.
///
/// The period is chosen so that every per-axis texture shift returns to zero
/// when the counter wraps, which makes the whole animation periodic with
/// exactly `period` steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    value: u32,
    period: u32,
}

impl Clock {
    pub fn new(period: u32) -> Self {
        Self {
            value: 0,
            period: period.max(1),
        }
    }

    /// Period that brings both texture axes back to their origin.
    pub fn period_for(texture_width: u32, texture_height: u32) -> u32 {
        lcm(texture_width.max(1), texture_height.max(1))
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn tick(&mut self) -> u32 {
        self.value = if self.value + 1 >= self.period {
            0
        } else {
            self.value + 1
        };
        self.value
    }

    pub fn set(&mut self, value: u64) {
        self.value = (value % self.period as u64) as u32;
    }

    /// `(value * rate) mod modulus`, computed without overflow.
    pub fn shift(&self, rate: u32, modulus: u32) -> u32 {
        let m = modulus.max(1) as u64;
        ((self.value as u64 * rate as u64) % m) as u32
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn lcm(a: u32, b: u32) -> u32 {
    let g = gcd(a, b).max(1);
    (a / g).saturating_mul(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_wraps_at_period() {
        let mut c = Clock::new(3);
        assert_eq!(c.tick(), 1);
        assert_eq!(c.tick(), 2);
        assert_eq!(c.tick(), 0);
        assert_eq!(c.tick(), 1);
    }

    #[test]
    fn period_is_lcm_of_texture_axes() {
        assert_eq!(Clock::period_for(256, 256), 256);
        assert_eq!(Clock::period_for(256, 96), 768);
        assert_eq!(Clock::period_for(7, 5), 35);
        assert_eq!(Clock::period_for(0, 0), 1);
    }

    #[test]
    fn shift_stays_in_range_for_large_rates() {
        let mut c = Clock::new(u32::MAX);
        c.set(u32::MAX as u64 - 1);
        let s = c.shift(u32::MAX, 256);
        assert!(s < 256);
    }

    #[test]
    fn set_reduces_modulo_period() {
        let mut c = Clock::new(10);
        c.set(25);
        assert_eq!(c.value(), 5);
    }
}
