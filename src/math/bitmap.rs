// Copyright 2020 @TwoCookingMice

use super::constants::Vector3f;

use std::ops;
use std::vec::Vec;

/// Row-major image of three-channel pixels, indexed by `(col, row)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self { data: vec![Vector3f::zeros(); width * height],
               width,
               height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Vector3f] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[Vector3f] {
        &self.data[row * self.width..(row + 1) * self.width]
    }

    /// Overwrites one row; `values` must hold `width` pixels.
    pub fn set_row(&mut self, row: usize, values: &[Vector3f]) {
        self.data[row * self.width..(row + 1) * self.width].copy_from_slice(values);
    }

    pub fn map<F: Fn(&Vector3f) -> Vector3f>(&self, f: F) -> Bitmap {
        Bitmap { data: self.data.iter().map(f).collect(), width: self.width, height: self.height }
    }
}

/* Test for Bitmap */
