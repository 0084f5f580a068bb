//! # Discrete Fourier Transform
//!
//! In-place transform over a [`ComplexBuffer`] of any length. Power-of-two
//! lengths take an iterative radix-2 path; every other length is factored
//! and handled by a recursive mixed-radix path.
//!
//! The transform is unitary: forward and inverse are each scaled by
//! `1/sqrt(N)`, so `inverse_transform(transform(x)) == x` without any extra
//! division. Magnitudes are therefore `sqrt(N)` smaller than those of the
//! unnormalised DFT.
//!
//! Forward uses the positive exponent `e^{+2*pi*i*nk/N}`. For real input the
//! magnitudes are identical to the negative-exponent convention.

use std::f32::consts::FRAC_1_SQRT_2;
use std::f64::consts::PI;

use super::complex::ComplexBuffer;

/// Forward transform, in place.
///
/// # Panics
/// * If the buffer is empty
pub fn transform(buffer: &mut ComplexBuffer) {
    fft(buffer, false);
}

/// Inverse transform, in place. Undoes [`transform`].
///
/// # Panics
/// * If the buffer is empty
pub fn inverse_transform(buffer: &mut ComplexBuffer) {
    fft(buffer, true);
}

fn fft(buffer: &mut ComplexBuffer, inverse: bool) {
    assert!(!buffer.is_empty(), "FFT length must be at least 1");

    if buffer.len().is_power_of_two() {
        radix2_iterative(buffer, inverse);
    } else {
        mixed_radix_recursive(buffer, inverse);
    }
}

/// Reverses the low `log2(n)` bits of `index`. `n` must be a power of two.
pub fn bit_reverse_index(mut index: usize, mut n: usize) -> usize {
    let mut reversed = 0;
    while n > 1 {
        reversed = (reversed << 1) | (index & 1);
        index >>= 1;
        n >>= 1;
    }
    reversed
}

/// Reorders the buffer into bit-reversed index order. Each pair is swapped
/// exactly once, so applying this twice restores the original order.
pub fn bit_reverse_permute(buffer: &mut ComplexBuffer) {
    let n = buffer.len();
    let (re, im) = buffer.parts_mut();
    for i in 0..n {
        let j = bit_reverse_index(i, n);
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

fn radix2_iterative(buffer: &mut ComplexBuffer, inverse: bool) {
    let n = buffer.len();
    bit_reverse_permute(buffer);

    let sign = if inverse { -1.0 } else { 1.0 };
    let (re, im) = buffer.parts_mut();

    let mut width = 1;
    while width < n {
        // One trig evaluation per stage; the rest of the twiddles come from
        // the recurrence f <- f * delta. The twiddle runs in f64: an f32
        // recurrence drifts past 1e-4 over the 2048 steps of N = 4096.
        let angle = PI / width as f64;
        let delta_r = angle.cos();
        let delta_i = sign * angle.sin();

        for group in 0..n / (2 * width) {
            let mut f_r = 1.0f64;
            let mut f_i = 0.0f64;

            for j in 0..width {
                let l = 2 * group * width + j;
                let r = l + width;

                let left_r = re[l];
                let left_i = im[l];
                let right_r = (f_r * re[r] as f64 - f_i * im[r] as f64) as f32;
                let right_i = (f_i * re[r] as f64 + f_r * im[r] as f64) as f32;

                re[l] = FRAC_1_SQRT_2 * (left_r + right_r);
                im[l] = FRAC_1_SQRT_2 * (left_i + right_i);
                re[r] = FRAC_1_SQRT_2 * (left_r - right_r);
                im[r] = FRAC_1_SQRT_2 * (left_i - right_i);

                let next_r = f_r * delta_r - f_i * delta_i;
                f_i = f_r * delta_i + f_i * delta_r;
                f_r = next_r;
            }
        }
        width <<= 1;
    }
}

/// Lowest odd factor `p >= 3` of `n` with `p * p <= n`, or `n` itself when
/// trial division finds none.
pub fn lowest_odd_factor(n: usize) -> usize {
    let mut factor = 3;
    while factor * factor <= n {
        if n % factor == 0 {
            return factor;
        }
        factor += 2;
    }
    n
}

fn mixed_radix_recursive(buffer: &mut ComplexBuffer, inverse: bool) {
    let n = buffer.len();
    if n == 1 {
        return;
    }

    let p = lowest_odd_factor(n);
    let m = n / p;
    let normalisation = 1.0 / (p as f64).sqrt();
    let sign = if inverse { -1.0 } else { 1.0 };

    // Twiddles and sums in f64; only the buffer itself is single precision.
    let mut out_r = vec![0.0f64; n];
    let mut out_i = vec![0.0f64; n];
    let mut sub = ComplexBuffer::new(m);

    for j in 0..p {
        {
            let (sub_r, sub_i) = sub.parts_mut();
            for i in 0..m {
                sub_r[i] = buffer.real()[i * p + j];
                sub_i[i] = buffer.imag()[i * p + j];
            }
        }
        if m > 1 {
            fft(&mut sub, inverse);
        }

        let angle = 2.0 * PI * j as f64 / n as f64;
        let delta_r = angle.cos();
        let delta_i = sign * angle.sin();
        let mut f_r = 1.0f64;
        let mut f_i = 0.0f64;

        for i in 0..n {
            let s_r = sub.real()[i % m] as f64;
            let s_i = sub.imag()[i % m] as f64;

            out_r[i] += f_r * s_r - f_i * s_i;
            out_i[i] += f_r * s_i + f_i * s_r;

            let next_r = f_r * delta_r - f_i * delta_i;
            f_i = f_r * delta_i + f_i * delta_r;
            f_r = next_r;
        }
    }

    let (re, im) = buffer.parts_mut();
    for i in 0..n {
        re[i] = (normalisation * out_r[i]) as f32;
        im[i] = (normalisation * out_i[i]) as f32;
    }
}
