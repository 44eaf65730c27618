use std::f64::consts::LN_2;

use libc::c_double;

use crate::stat_funcs::chisq1;

#[link(name = "m")]
unsafe extern "C" {
    unsafe fn lgamma(x: c_double) -> c_double;
}

const LFACT_STORE_SIZE: usize = 256;

fn addlog(x1: f64, x2: f64) -> f64 {
    let (hi, lo) = if x1 > x2 { (x1, x2) } else { (x2, x1) };
    let diff = lo - hi;
    if diff < -745.0 {
        hi
    } else {
        hi + diff.exp().ln_1p()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct McNemarRes {
    statistic: f64,
    p_value: f64,
}

impl McNemarRes {
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}

/// McNemar tests on the discordant cells b and c of a paired 2x2 table
pub struct McNemarTest {
    lfact_store: [f64; LFACT_STORE_SIZE],
}

impl Default for McNemarTest {
    fn default() -> Self {
        Self::new()
    }
}

impl McNemarTest {
    pub fn new() -> Self {
        let mut lfact_store = [0.0; LFACT_STORE_SIZE];
        for i in 2..LFACT_STORE_SIZE {
            lfact_store[i] = lfact_store[i - 1] + (i as f64).ln();
        }
        Self { lfact_store }
    }

    pub fn lfact(&self, x: usize) -> f64 {
        if x < LFACT_STORE_SIZE {
            self.lfact_store[x]
        } else {
            unsafe { lgamma((x + 1) as f64) }
        }
    }

    /// Exact test: twice the lower tail of Binomial(b + c, 1/2) at min(b, c),
    /// capped at 1
    pub fn exact(&self, b: usize, c: usize) -> f64 {
        let n = b + c;
        if n == 0 {
            return 1.0;
        }
        let k = b.min(c);
        // Start from the largest term P(X = k) and step down using
        // P(X = i - 1) / P(X = i) = i / (n - i + 1)
        let mut llike = self.ldbinom_half(n, k);
        let mut lprob = llike;
        for i in (1..=k).rev() {
            llike += ((i as f64) / ((n - i + 1) as f64)).ln();
            lprob = addlog(lprob, llike);
        }
        (LN_2 + lprob).exp().min(1.0)
    }

    /// Log probability of exactly k successes in Binomial(n, 1/2)
    pub fn ldbinom_half(&self, n: usize, k: usize) -> f64 {
        assert!(k <= n);
        self.lfact(n) - self.lfact(k) - self.lfact(n - k) - (n as f64) * LN_2
    }

    /// Chi-square test with continuity correction
    pub fn chisq(&self, b: usize, c: usize) -> McNemarRes {
        let n = b + c;
        if n == 0 {
            return McNemarRes {
                statistic: 0.0,
                p_value: 1.0,
            };
        }
        let d = ((b as f64) - (c as f64)).abs() - 1.0;
        let statistic = d * d / (n as f64);
        McNemarRes {
            statistic,
            p_value: chisq1(statistic),
        }
    }
}
