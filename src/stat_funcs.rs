#[link(name = "m")]
unsafe extern "C" {
   #[link_name = "erfc"]
   fn libm_erfc(x: f64) -> f64;
}

use std::f64::consts::SQRT_2;

use statrs::distribution::{ContinuousCDF, StudentsT};

pub fn erfc(x: f64) -> f64 {
   unsafe { libm_erfc(x) }
}

/// Upper tail of standard normal
pub fn pnormc(z: f64) -> f64 {
   0.5 * erfc(z / SQRT_2)
}

/// Upper tail of chi-squared prob. of x with 1df
pub fn chisq1(x: f64) -> f64 {
   2.0 * pnormc(x.sqrt())
}

/// Two sided tail prob. of Student's t with df degrees of freedom
pub fn pt2(t: f64, df: f64) -> anyhow::Result<f64> {
   if t.is_nan() {
      return Ok(f64::NAN);
   }
   if t.is_infinite() {
      return Ok(0.0);
   }
   let dist = StudentsT::new(0.0, 1.0, df)
      .map_err(|e| anyhow!("Invalid t distribution with {} df: {}", df, e))?;
   Ok((2.0 * dist.cdf(-t.abs())).min(1.0))
}
