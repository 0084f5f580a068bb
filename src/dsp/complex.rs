/// A fixed-length buffer of complex samples stored as parallel real and
/// imaginary arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexBuffer {
    real: Vec<f32>,
    imag: Vec<f32>,
}

impl ComplexBuffer {
    /// Zero-filled buffer of `n` samples.
    pub fn new(n: usize) -> Self {
        Self {
            real: vec![0.0; n],
            imag: vec![0.0; n],
        }
    }

    /// Buffer holding `samples` as the real part, imaginary part zeroed.
    pub fn from_real(samples: &[f32]) -> Self {
        Self {
            real: samples.to_vec(),
            imag: vec![0.0; samples.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    pub fn real(&self) -> &[f32] {
        &self.real
    }

    pub fn imag(&self) -> &[f32] {
        &self.imag
    }

    pub fn real_mut(&mut self) -> &mut [f32] {
        &mut self.real
    }

    pub fn imag_mut(&mut self) -> &mut [f32] {
        &mut self.imag
    }

    /// Both component slices at once, for loops that write real and
    /// imaginary parts together.
    pub fn parts_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.real, &mut self.imag)
    }

    /// `(re, im)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.real.iter().copied().zip(self.imag.iter().copied())
    }
}
