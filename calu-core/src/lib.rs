//! `calu` core module.
//!
//! This module contains:
//! - the coefficient domain abstraction ([`ExactField`], [`ZeroCheck`]),
//! - definitions of matrix structures ([`MatRef`], [`MatMut`], [`Mat`]),
//! - matrix multiplication and subtraction routines,
//! - triangular matrix solve routines,
//! - row permutations.
//!
//! Elements are *exact*: arithmetic never rounds, but deciding whether an element is zero may be
//! expensive, and may fail altogether. Every routine in this crate that needs to branch on zeros
//! goes through [`ExactField::calu_is_zero`] and never treats [`ZeroCheck::Unknown`] as a boolean.

#![warn(rust_2018_idioms)]

use assert2::{assert as fancy_assert, debug_assert as fancy_debug_assert};
use core::{
    fmt::Debug,
    marker::PhantomData,
    ops::{Index, IndexMut},
    ptr::NonNull,
};
use num_integer::Integer;
use num_rational::Ratio;
use num_traits::{One, Zero};
use reborrow::*;

pub mod mul;
pub mod permutation;
pub mod solve;
pub mod sub;

/// Outcome of a zero test on an exact element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZeroCheck {
    /// The element is certified to be zero.
    Zero,
    /// The element is certified to be nonzero.
    NonZero,
    /// The domain could not decide.
    Unknown,
}

/// Trait that describes a field of exact computable numbers.
///
/// Arithmetic is exact. The zero test is tristate, since for symbolic or algebraic
/// representations equality to zero can be undecidable in general.
pub trait ExactField: Clone + Debug + 'static {
    /// Returns the value representing `0`.
    fn calu_zero() -> Self;
    /// Returns the value representing `1`.
    fn calu_one() -> Self;

    /// Returns `self + rhs`.
    fn calu_add(&self, rhs: &Self) -> Self;
    /// Returns `self - rhs`.
    fn calu_sub(&self, rhs: &Self) -> Self;
    /// Returns `self * rhs`.
    fn calu_mul(&self, rhs: &Self) -> Self;
    /// Returns the multiplicative inverse of `self`.
    ///
    /// Callers must only invoke this on elements for which [`Self::calu_is_zero`] returned
    /// [`ZeroCheck::NonZero`].
    fn calu_inv(&self) -> Self;

    /// Tests whether `self` is zero.
    fn calu_is_zero(&self) -> ZeroCheck;
}

impl<I> ExactField for Ratio<I>
where
    I: Clone + Integer + Debug + 'static,
{
    #[inline]
    fn calu_zero() -> Self {
        Self::zero()
    }
    #[inline]
    fn calu_one() -> Self {
        Self::one()
    }

    #[inline]
    fn calu_add(&self, rhs: &Self) -> Self {
        self + rhs
    }
    #[inline]
    fn calu_sub(&self, rhs: &Self) -> Self {
        self - rhs
    }
    #[inline]
    fn calu_mul(&self, rhs: &Self) -> Self {
        self * rhs
    }
    #[inline]
    fn calu_inv(&self) -> Self {
        self.recip()
    }

    #[inline]
    fn calu_is_zero(&self) -> ZeroCheck {
        if Zero::is_zero(self) {
            ZeroCheck::Zero
        } else {
            ZeroCheck::NonZero
        }
    }
}

struct MatrixSliceBase<T> {
    ptr: NonNull<T>,
    nrows: usize,
    ncols: usize,
    row_stride: isize,
    col_stride: isize,
}

impl<T> Copy for MatrixSliceBase<T> {}
impl<T> Clone for MatrixSliceBase<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> MatrixSliceBase<T> {
    #[inline]
    fn ptr_at(&self, i: usize, j: usize) -> *mut T {
        self.ptr
            .as_ptr()
            .wrapping_offset(i as isize * self.row_stride)
            .wrapping_offset(j as isize * self.col_stride)
    }

    /// Window of shape `nrows×ncols` starting at `(i, j)`, with the same strides.
    ///
    /// # Safety
    ///
    /// `(i, j)` must lie within the bounds of `self`, or on its last row or column boundary.
    #[inline]
    unsafe fn window(&self, i: usize, j: usize, nrows: usize, ncols: usize) -> Self {
        Self {
            ptr: NonNull::new_unchecked(self.ptr_at(i, j)),
            nrows,
            ncols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
        }
    }

    #[inline]
    unsafe fn quadrants(&self, i: usize, j: usize) -> [Self; 4] {
        let (m, n) = (self.nrows - i, self.ncols - j);
        [
            self.window(0, 0, i, j),
            self.window(0, j, i, n),
            self.window(i, 0, m, j),
            self.window(i, j, m, n),
        ]
    }

    #[inline]
    fn transposed(&self) -> Self {
        Self {
            ptr: self.ptr,
            nrows: self.ncols,
            ncols: self.nrows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }
}

/// Matrix view with general row and column strides.
///
/// A view never owns its elements. Creating one, splitting it or taking a submatrix never
/// copies anything: every read and write goes to the storage of the matrix it was created from.
pub struct MatRef<'a, T> {
    base: MatrixSliceBase<T>,
    _marker: PhantomData<&'a T>,
}

/// Mutable matrix view with general row and column strides.
///
/// For usage examples, see [`MatRef`].
pub struct MatMut<'a, T> {
    base: MatrixSliceBase<T>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Copy for MatRef<'a, T> {}
impl<'a, T> Clone for MatRef<'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'b, 'a, T> Reborrow<'b> for MatRef<'a, T> {
    type Target = MatRef<'b, T>;
    #[inline]
    fn rb(&'b self) -> Self::Target {
        *self
    }
}
impl<'b, 'a, T> ReborrowMut<'b> for MatRef<'a, T> {
    type Target = MatRef<'b, T>;
    #[inline]
    fn rb_mut(&'b mut self) -> Self::Target {
        *self
    }
}

impl<'b, 'a, T> Reborrow<'b> for MatMut<'a, T> {
    type Target = MatRef<'b, T>;
    #[inline]
    fn rb(&'b self) -> Self::Target {
        MatRef {
            base: self.base,
            _marker: PhantomData,
        }
    }
}
impl<'b, 'a, T> ReborrowMut<'b> for MatMut<'a, T> {
    type Target = MatMut<'b, T>;
    #[inline]
    fn rb_mut(&'b mut self) -> Self::Target {
        MatMut {
            base: self.base,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> IntoConst for MatRef<'a, T> {
    type Target = MatRef<'a, T>;
    #[inline]
    fn into_const(self) -> Self::Target {
        self
    }
}
impl<'a, T> IntoConst for MatMut<'a, T> {
    type Target = MatRef<'a, T>;
    #[inline]
    fn into_const(self) -> Self::Target {
        MatRef {
            base: self.base,
            _marker: PhantomData,
        }
    }
}

impl<'a, 'b, T: PartialEq> PartialEq<MatRef<'b, T>> for MatRef<'a, T> {
    fn eq(&self, other: &MatRef<'b, T>) -> bool {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return false;
        }
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                // SAFETY: bounds were checked above
                if unsafe { self.get_unchecked(i, j) != other.get_unchecked(i, j) } {
                    return false;
                }
            }
        }
        true
    }
}

#[inline]
#[track_caller]
fn checked_len(nrows: usize, ncols: usize) -> usize {
    match nrows.checked_mul(ncols) {
        Some(len) => len,
        None => panic!("capacity overflow"),
    }
}

impl<'a, T> MatRef<'a, T> {
    #[inline]
    fn from_base(base: MatrixSliceBase<T>) -> Self {
        Self {
            base,
            _marker: PhantomData,
        }
    }

    /// Returns a view over the `nrows×ncols` elements at `ptr + i * row_stride + j * col_stride`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non null and aligned. Every element of the view must be initialized and
    /// stay unmodified for `'a`.
    #[inline]
    pub unsafe fn from_raw_parts(
        ptr: *const T,
        nrows: usize,
        ncols: usize,
        row_stride: isize,
        col_stride: isize,
    ) -> Self {
        Self {
            base: MatrixSliceBase::<T> {
                ptr: NonNull::new_unchecked(ptr as *mut T),
                nrows,
                ncols,
                row_stride,
                col_stride,
            },
            _marker: PhantomData,
        }
    }

    /// Returns a column major view over the elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice.len() != nrows * ncols`.
    #[track_caller]
    #[inline]
    pub fn from_column_major_slice(slice: &'a [T], nrows: usize, ncols: usize) -> Self {
        fancy_assert!(slice.len() == checked_len(nrows, ncols));
        // SAFETY: the slice holds exactly `nrows * ncols` initialized elements, laid out with a
        // column stride of `nrows`.
        unsafe { Self::from_raw_parts(slice.as_ptr(), nrows, ncols, 1, nrows as isize) }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.base.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.base.ncols
    }

    /// Returns a reference to the element at `(i, j)`.
    ///
    /// # Safety
    ///
    /// `i < self.nrows()` and `j < self.ncols()`.
    #[track_caller]
    #[inline]
    pub unsafe fn get_unchecked(self, i: usize, j: usize) -> &'a T {
        fancy_debug_assert!(i < self.nrows());
        fancy_debug_assert!(j < self.ncols());
        &*self.base.ptr_at(i, j)
    }

    /// Returns a reference to the element at position (i, j), or panics if the indices are out of
    /// bounds.
    #[track_caller]
    #[inline]
    pub fn get(self, i: usize, j: usize) -> &'a T {
        fancy_assert!(i < self.nrows());
        fancy_assert!(j < self.ncols());
        // SAFETY: bounds have been checked
        unsafe { self.get_unchecked(i, j) }
    }

    /// Same as [`Self::split_at`], without bound checks.
    ///
    /// # Safety
    ///
    /// `i <= self.nrows()` and `j <= self.ncols()`.
    #[track_caller]
    #[inline]
    pub unsafe fn split_at_unchecked(self, i: usize, j: usize) -> (Self, Self, Self, Self) {
        fancy_debug_assert!(i <= self.nrows());
        fancy_debug_assert!(j <= self.ncols());
        let [top_left, top_right, bot_left, bot_right] = self.base.quadrants(i, j);
        (
            Self::from_base(top_left),
            Self::from_base(top_right),
            Self::from_base(bot_left),
            Self::from_base(bot_right),
        )
    }

    /// Splits the matrix into four corner parts in the following order: top left, top right,
    /// bottom left, bottom right.
    ///
    /// # Panics
    ///
    /// Requires that
    /// - `i <= self.nrows()`,
    /// - `j <= self.ncols()`.
    ///
    /// Otherwise, it panics.
    ///
    /// # Example
    ///
    /// ```
    /// use calu_core::mat;
    /// use num_rational::Rational64;
    ///
    /// let m = mat![
    ///     [Rational64::from(0), Rational64::from(2), Rational64::from(4)],
    ///     [Rational64::from(1), Rational64::from(3), Rational64::from(5)],
    /// ];
    /// let (top_left, top_right, bot_left, bot_right) = m.as_ref().split_at(1, 1);
    ///
    /// assert_eq!((top_left.nrows(), top_left.ncols()), (1, 1));
    /// assert_eq!(top_right[(0, 1)], Rational64::from(4));
    /// assert_eq!(bot_left[(0, 0)], Rational64::from(1));
    /// assert_eq!(bot_right[(0, 0)], Rational64::from(3));
    /// ```
    #[track_caller]
    #[inline]
    pub fn split_at(self, i: usize, j: usize) -> (Self, Self, Self, Self) {
        fancy_assert!(i <= self.nrows());
        fancy_assert!(j <= self.ncols());
        // SAFETY: bounds have been checked
        unsafe { self.split_at_unchecked(i, j) }
    }

    /// Same as [`Self::submatrix`], without bound checks.
    ///
    /// # Safety
    ///
    /// The window `i..i + nrows`, `j..j + ncols` must lie within `self`.
    #[track_caller]
    #[inline]
    pub unsafe fn submatrix_unchecked(
        self,
        i: usize,
        j: usize,
        nrows: usize,
        ncols: usize,
    ) -> Self {
        fancy_debug_assert!(i <= self.nrows());
        fancy_debug_assert!(j <= self.ncols());
        fancy_debug_assert!(nrows <= self.nrows() - i);
        fancy_debug_assert!(ncols <= self.ncols() - j);
        Self::from_base(self.base.window(i, j, nrows, ncols))
    }

    /// Returns a view over a submatrix of `self`, starting at position `(i, j)`
    /// with dimensions `(nrows, ncols)`.
    ///
    /// # Panics
    ///
    /// Requires that
    /// - `i <= self.nrows()`,
    /// - `j <= self.ncols()`,
    /// - `nrows <= self.nrows() - i`,
    /// - `ncols <= self.ncols() - j`.
    ///
    /// Otherwise, it panics.
    #[track_caller]
    #[inline]
    pub fn submatrix(self, i: usize, j: usize, nrows: usize, ncols: usize) -> Self {
        fancy_assert!(i <= self.nrows());
        fancy_assert!(j <= self.ncols());
        fancy_assert!(nrows <= self.nrows() - i);
        fancy_assert!(ncols <= self.ncols() - j);
        unsafe { self.submatrix_unchecked(i, j, nrows, ncols) }
    }

    #[inline]
    pub fn transpose(self) -> Self {
        Self::from_base(self.base.transposed())
    }

    /// Returns an owning [`Mat`] of the data.
    #[inline]
    pub fn to_owned(&self) -> Mat<T>
    where
        T: Clone,
    {
        let this = *self;
        Mat::with_dims(
            |i, j| unsafe { this.get_unchecked(i, j) }.clone(),
            self.nrows(),
            self.ncols(),
        )
    }
}

impl<'a, T> MatMut<'a, T> {
    /// Mutable counterpart of [`MatRef::from_raw_parts`].
    ///
    /// # Safety
    ///
    /// Same as [`MatRef::from_raw_parts`]. Additionally, no two positions of the view may refer to
    /// the same element, and the elements must not be accessed through any other pointer for `'a`.
    #[inline]
    pub unsafe fn from_raw_parts(
        ptr: *mut T,
        nrows: usize,
        ncols: usize,
        row_stride: isize,
        col_stride: isize,
    ) -> Self {
        Self {
            base: MatrixSliceBase::<T> {
                ptr: NonNull::new_unchecked(ptr),
                nrows,
                ncols,
                row_stride,
                col_stride,
            },
            _marker: PhantomData,
        }
    }

    /// Returns a mutable column major view over the elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice.len() != nrows * ncols`.
    #[track_caller]
    #[inline]
    pub fn from_column_major_slice(slice: &'a mut [T], nrows: usize, ncols: usize) -> Self {
        fancy_assert!(slice.len() == checked_len(nrows, ncols));
        // SAFETY: the slice is uniquely borrowed and holds exactly `nrows * ncols` initialized
        // elements, laid out with a column stride of `nrows`.
        unsafe { Self::from_raw_parts(slice.as_mut_ptr(), nrows, ncols, 1, nrows as isize) }
    }

    /// Returns a mutable pointer to the first (top left) element of the matrix.
    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.base.ptr.as_ptr()
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.base.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.base.ncols
    }

    /// Offset between two successive rows.
    #[inline]
    pub fn row_stride(&self) -> isize {
        self.base.row_stride
    }

    /// Offset between two successive columns.
    #[inline]
    pub fn col_stride(&self) -> isize {
        self.base.col_stride
    }

    /// Returns a mutable reference to the element at `(i, j)`.
    ///
    /// # Safety
    ///
    /// `i < self.nrows()` and `j < self.ncols()`.
    #[track_caller]
    #[inline]
    pub unsafe fn get_unchecked(self, i: usize, j: usize) -> &'a mut T {
        fancy_debug_assert!(i < self.nrows());
        fancy_debug_assert!(j < self.ncols());
        &mut *self.base.ptr_at(i, j)
    }

    /// Returns a mutable reference to the element at position (i, j), or panics if the indices are
    /// out of bounds.
    #[track_caller]
    #[inline]
    pub fn get(self, i: usize, j: usize) -> &'a mut T {
        fancy_assert!(i < self.nrows());
        fancy_assert!(j < self.ncols());
        // SAFETY: bounds have been checked.
        unsafe { self.get_unchecked(i, j) }
    }

    /// Same as [`Self::split_at`], without bound checks.
    ///
    /// # Safety
    ///
    /// `i <= self.nrows()` and `j <= self.ncols()`.
    #[track_caller]
    #[inline]
    pub unsafe fn split_at_unchecked(self, i: usize, j: usize) -> (Self, Self, Self, Self) {
        let (top_left, top_right, bot_left, bot_right) =
            self.into_const().split_at_unchecked(i, j);
        (
            top_left.const_cast(),
            top_right.const_cast(),
            bot_left.const_cast(),
            bot_right.const_cast(),
        )
    }

    /// Splits the matrix into four corner parts in the following order: top left, top right,
    /// bottom left, bottom right.
    ///
    /// The four parts are disjoint, so they may be written to independently.
    ///
    /// # Panics
    ///
    /// Requires that
    /// - `i <= self.nrows()`,
    /// - `j <= self.ncols()`.
    ///
    /// Otherwise, it panics.
    #[track_caller]
    #[inline]
    pub fn split_at(self, i: usize, j: usize) -> (Self, Self, Self, Self) {
        fancy_assert!(i <= self.nrows());
        fancy_assert!(j <= self.ncols());
        // SAFETY: bounds have been checked
        unsafe { self.split_at_unchecked(i, j) }
    }

    /// Returns a view over a submatrix of `self`, with no bound checks.
    ///
    /// # Safety
    ///
    /// Same as [`MatRef::submatrix_unchecked`].
    #[track_caller]
    #[inline]
    pub unsafe fn submatrix_unchecked(
        self,
        i: usize,
        j: usize,
        nrows: usize,
        ncols: usize,
    ) -> Self {
        self.into_const()
            .submatrix_unchecked(i, j, nrows, ncols)
            .const_cast()
    }

    /// Returns a view over a submatrix of `self`, starting at position `(i, j)`
    /// with dimensions `(nrows, ncols)`.
    ///
    /// Writes through the returned window are writes to `self`.
    ///
    /// # Panics
    ///
    /// Requires that
    /// - `i <= self.nrows()`,
    /// - `j <= self.ncols()`,
    /// - `nrows <= self.nrows() - i`,
    /// - `ncols <= self.ncols() - j`.
    ///
    /// Otherwise, it panics.
    #[track_caller]
    #[inline]
    pub fn submatrix(self, i: usize, j: usize, nrows: usize, ncols: usize) -> Self {
        fancy_assert!(i <= self.nrows());
        fancy_assert!(j <= self.ncols());
        fancy_assert!(nrows <= self.nrows() - i);
        fancy_assert!(ncols <= self.ncols() - j);
        unsafe { self.submatrix_unchecked(i, j, nrows, ncols) }
    }

    #[inline]
    pub fn transpose(self) -> Self {
        Self {
            base: self.base.transposed(),
            _marker: PhantomData,
        }
    }

    /// Clones the elements of `src` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of `self` and `src` don't match.
    #[track_caller]
    pub fn copy_from(&mut self, src: MatRef<'_, T>)
    where
        T: Clone,
    {
        fancy_assert!((self.nrows(), self.ncols()) == (src.nrows(), src.ncols()));
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                // SAFETY: bounds have been checked
                unsafe {
                    self.rb_mut()
                        .get_unchecked(i, j)
                        .clone_from(src.get_unchecked(i, j));
                }
            }
        }
    }

    /// Returns an owning [`Mat`] of the data.
    #[inline]
    pub fn to_owned(&self) -> Mat<T>
    where
        T: Clone,
    {
        self.rb().to_owned()
    }
}

impl<'a, T> MatRef<'a, T> {
    #[inline]
    unsafe fn const_cast(self) -> MatMut<'a, T> {
        MatMut {
            base: self.base,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Index<(usize, usize)> for MatRef<'a, T> {
    type Output = T;

    #[track_caller]
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        self.get(i, j)
    }
}
impl<'a, T> Index<(usize, usize)> for MatMut<'a, T> {
    type Output = T;

    #[track_caller]
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        self.rb().get(i, j)
    }
}
impl<'a, T> IndexMut<(usize, usize)> for MatMut<'a, T> {
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        self.rb_mut().get(i, j)
    }
}

impl<'a, T: Debug> Debug for MatRef<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct DebugRow<'a, T>(MatRef<'a, T>, usize);

        impl<'a, T: Debug> Debug for DebugRow<'a, T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let (mat, i) = (self.0, self.1);
                f.debug_list()
                    .entries((0..mat.ncols()).map(|j| mat.get(i, j)))
                    .finish()
            }
        }

        f.debug_list()
            .entries((0..self.nrows()).map(|i| DebugRow(*self, i)))
            .finish()
    }
}
impl<'a, T: Debug> Debug for MatMut<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.rb().fmt(f)
    }
}

/// Owning matrix structure stored in column major format.
///
/// A matrix can be thought of as a 2D array of values.
/// These values are stored in memory so that the columns are contiguous.
#[derive(Clone)]
pub struct Mat<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T> Default for Mat<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mat<T> {
    /// Returns a new matrix with dimensions `(0, 0)`. This does not allocate.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            nrows: 0,
            ncols: 0,
        }
    }

    /// Returns a new matrix with dimensions `(nrows, ncols)`, filled with the provided function.
    ///
    /// # Panics
    ///
    /// Panics if the total capacity overflows `usize`.
    #[track_caller]
    pub fn with_dims(mut f: impl FnMut(usize, usize) -> T, nrows: usize, ncols: usize) -> Self {
        let mut data = Vec::with_capacity(checked_len(nrows, ncols));
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Returns a new matrix with dimensions `(nrows, ncols)`, filled with zeros.
    #[inline]
    pub fn zeros(nrows: usize, ncols: usize) -> Self
    where
        T: ExactField,
    {
        Self::with_dims(|_, _| T::calu_zero(), nrows, ncols)
    }

    /// Returns a new matrix built from a list of rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows don't all have the same length.
    #[track_caller]
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut rows = rows
            .into_iter()
            .map(|row| {
                fancy_assert!(row.len() == ncols);
                row.into_iter()
            })
            .collect::<Vec<_>>();

        let mut data = Vec::with_capacity(checked_len(nrows, ncols));
        for _ in 0..ncols {
            for row in rows.iter_mut() {
                data.extend(row.next());
            }
        }
        Self { data, nrows, ncols }
    }

    /// Returns the number of rows of the matrix.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns of the matrix.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns a view over the matrix.
    #[inline]
    pub fn as_ref(&self) -> MatRef<'_, T> {
        MatRef::from_column_major_slice(&self.data, self.nrows, self.ncols)
    }

    /// Returns a mutable view over the matrix.
    #[inline]
    pub fn as_mut(&mut self) -> MatMut<'_, T> {
        MatMut::from_column_major_slice(&mut self.data, self.nrows, self.ncols)
    }
}

impl<T: PartialEq> PartialEq for Mat<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<T: Debug> Debug for Mat<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl<T> Index<(usize, usize)> for Mat<T> {
    type Output = T;

    #[track_caller]
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        self.as_ref().get(i, j)
    }
}
impl<T> IndexMut<(usize, usize)> for Mat<T> {
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        self.as_mut().get(i, j)
    }
}

/// Returns a [`Mat`] containing the arguments, given row by row.
///
/// # Example
///
/// ```
/// use calu_core::mat;
/// use num_rational::Rational64;
///
/// let m = mat![
///     [Rational64::from(0), Rational64::from(3)],
///     [Rational64::from(1), Rational64::from(4)],
///     [Rational64::from(2), Rational64::from(5)],
/// ];
///
/// assert_eq!((m.nrows(), m.ncols()), (3, 2));
/// assert_eq!(m[(2, 0)], Rational64::from(2));
/// assert_eq!(m[(0, 1)], Rational64::from(3));
/// ```
#[macro_export]
macro_rules! mat {
    () => {
        {
            compile_error!("number of columns in the matrix is ambiguous");
        }
    };

    ($([$($v:expr),* $(,)?] ),* $(,)?) => {
        {
            let rows = ::std::vec![$(::std::vec![$($v),*]),*];
            $crate::Mat::from_rows(rows)
        }
    };
}
