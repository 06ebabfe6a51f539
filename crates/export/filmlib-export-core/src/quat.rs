//! Quaternion helpers over flat `[x, y, z, w]` samples.

pub type Quat = [f64; 4];

pub fn dot(a: &Quat, b: &Quat) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Negate `q` when it sits on the opposite hemisphere from `prev`, so
/// consecutive samples never jump across the double cover.
pub fn continuous(prev: Option<&Quat>, q: Quat) -> Quat {
    match prev {
        Some(p) if dot(p, &q) < 0.0 => q.map(|c| -c),
        _ => q,
    }
}

/// Sign-fix a whole sequence in place.
pub fn make_continuous(samples: &mut [Quat]) {
    for i in 1..samples.len() {
        samples[i] = continuous(Some(&samples[i - 1]), samples[i]);
    }
}

/// True when a flat `x, y, z, w` list holds fewer than two samples or every
/// sample is within `eps` of the first, component by component.
pub fn is_constant(values: &[f64], eps: f64) -> bool {
    if values.len() < 8 {
        return true;
    }
    let base = &values[..4];
    values
        .chunks_exact(4)
        .skip(1)
        .all(|q| q.iter().zip(base).all(|(a, b)| (a - b).abs() <= eps))
}
