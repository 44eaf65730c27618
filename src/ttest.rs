use crate::stat_funcs::pt2;

#[derive(Debug, Copy, Clone)]
pub struct TTestRes {
    t: f64,
    df: usize,
    p_value: f64,
}

impl TTestRes {
    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn df(&self) -> usize {
        self.df
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}

/// Two sided paired t-test of x against y
///
/// With zero variance of the differences t is infinite (p = 0), or NaN if
/// the mean difference is also zero.
pub fn paired_ttest(x: &[f64], y: &[f64]) -> anyhow::Result<TTestRes> {
    if x.len() != y.len() {
        return Err(anyhow!(
            "Paired samples differ in length ({} and {})",
            x.len(),
            y.len()
        ));
    }
    let n = x.len();
    if n < 2 {
        return Err(anyhow!("At least 2 pairs needed for a paired t-test (found {})", n));
    }
    let nf = n as f64;
    let mean = x.iter().zip(y).map(|(a, b)| a - b).sum::<f64>() / nf;
    let ss: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| {
            let z = a - b - mean;
            z * z
        })
        .sum();
    let df = n - 1;
    let se = (ss / (df as f64) / nf).sqrt();
    let t = mean / se;
    let p_value = pt2(t, df as f64)?;
    trace!("Paired t-test: n = {}, mean diff = {}, se = {}", n, mean, se);
    Ok(TTestRes { t, df, p_value })
}
