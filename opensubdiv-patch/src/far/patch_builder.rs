//! Scheme-specific dispatch of patch conversions.
//!
//! A [`PatchBuilder`] is configured once with a subdivision [`Scheme`] and
//! the bases wanted for regular and irregular patches. It then converts any
//! number of [`SourcePatch`]es of that scheme to the requested
//! [`PatchType`].
use super::{
    convert_to_box_spline, BSplineConverter, BasisType, CatmarkLimits, GregoryConverter,
    GregoryTriConverter, LimitWeights, LoopLimits, PatchType, SourcePatch, SparseMatrix,
};
use crate::{sdc::Scheme, Error, Real, Result};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Options for creating a [`PatchBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatchBuilderOptions {
    /// The basis of regular patches.
    pub regular_basis: BasisType,
    /// The basis of irregular patches. [`BasisType::Unspecified`] means the
    /// same as `regular_basis`.
    pub irregular_basis: BasisType,
}

impl Default for PatchBuilderOptions {
    fn default() -> Self {
        Self {
            regular_basis: BasisType::Regular,
            irregular_basis: BasisType::Unspecified,
        }
    }
}

/// Converts [`SourcePatch`]es of one subdivision scheme to patches.
///
/// # Examples
///
/// ```
/// use opensubdiv_patch::far::{BasisType, PatchBuilder, PatchBuilderOptions, PatchType};
/// use opensubdiv_patch::sdc::Scheme;
///
/// let builder = PatchBuilder::new(
///     Scheme::Loop,
///     PatchBuilderOptions {
///         irregular_basis: BasisType::Gregory,
///         ..Default::default()
///     },
/// )?;
///
/// assert_eq!(builder.regular_patch_type(), PatchType::Loop);
/// assert_eq!(builder.irregular_patch_type(), PatchType::GregoryTriangle);
/// assert_eq!(builder.linear_patch_type(), PatchType::Triangles);
/// # Ok::<(), opensubdiv_patch::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchBuilder {
    scheme: Scheme,
    options: PatchBuilderOptions,
    regular_patch_type: PatchType,
    irregular_patch_type: PatchType,
    native_patch_type: PatchType,
    linear_patch_type: PatchType,
}

impl PatchBuilder {
    /// Creates a builder for `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScheme`] for [`Scheme::Bilinear`].
    pub fn new(scheme: Scheme, options: PatchBuilderOptions) -> Result<Self> {
        let (native_patch_type, linear_patch_type) = match scheme {
            Scheme::CatmullClark => (PatchType::Regular, PatchType::Quads),
            Scheme::Loop => (PatchType::Loop, PatchType::Triangles),
            Scheme::Bilinear => return Err(Error::UnsupportedScheme(scheme)),
        };

        let regular_patch_type = patch_type_from_basis(scheme, options.regular_basis);
        let irregular_patch_type = match options.irregular_basis {
            BasisType::Unspecified => regular_patch_type,
            basis => patch_type_from_basis(scheme, basis),
        };

        log::debug!(
            "patch builder: {scheme}, regular {regular_patch_type}, irregular {irregular_patch_type}"
        );

        Ok(Self {
            scheme,
            options,
            regular_patch_type,
            irregular_patch_type,
            native_patch_type,
            linear_patch_type,
        })
    }

    /// Returns the subdivision scheme.
    #[inline]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the options the builder was created with.
    #[inline]
    pub fn options(&self) -> &PatchBuilderOptions {
        &self.options
    }

    /// Returns the number of corners of a regular face of the scheme.
    #[inline]
    pub fn regular_face_size(&self) -> usize {
        self.scheme.regular_face_size()
    }

    /// Returns the patch type for the regular basis of the options.
    #[inline]
    pub fn regular_patch_type(&self) -> PatchType {
        self.regular_patch_type
    }

    /// Returns the patch type for the irregular basis of the options.
    #[inline]
    pub fn irregular_patch_type(&self) -> PatchType {
        self.irregular_patch_type
    }

    /// Returns the patch type of the scheme's own limit surface.
    #[inline]
    pub fn native_patch_type(&self) -> PatchType {
        self.native_patch_type
    }

    /// Returns the patch type of the scheme's linear basis.
    #[inline]
    pub fn linear_patch_type(&self) -> PatchType {
        self.linear_patch_type
    }

    /// Returns the patch type for `basis` in this builder's scheme.
    ///
    /// Bases the scheme has no patch for map to [`PatchType::NonPatch`].
    #[inline]
    pub fn patch_type_from_basis(&self, basis: BasisType) -> PatchType {
        patch_type_from_basis(self.scheme, basis)
    }

    /// Computes the matrix converting the points of `source` to the control
    /// points of a patch of type `patch_type`.
    ///
    /// `matrix` is resized as needed. Returns the number of rows, i.e. the
    /// number of patch control points.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSourcePatch`] if `source` is not a face of the
    ///   builder's scheme (a triangle given to a *Catmull-Clark* builder and
    ///   vice versa).
    /// * [`Error::UnsupportedPatchType`] if the scheme has no conversion to
    ///   `patch_type`.
    pub fn convert_to_patch_type<R: Real>(
        &self,
        source: &SourcePatch,
        patch_type: PatchType,
        matrix: &mut SparseMatrix<R>,
    ) -> Result<usize> {
        if source.corner_count() != self.regular_face_size() {
            return Err(Error::InvalidSourcePatch(format!(
                "{} corners given to a {} patch builder",
                source.corner_count(),
                self.scheme
            )));
        }

        match (self.scheme, patch_type) {
            (Scheme::CatmullClark, PatchType::GregoryBasis) => {
                GregoryConverter::new(source).convert(matrix)
            }
            (Scheme::CatmullClark, PatchType::Regular) => {
                BSplineConverter::new(source).convert(matrix)
            }
            (Scheme::CatmullClark, PatchType::Quads) => {
                convert_to_linear::<CatmarkLimits, R>(source, matrix)
            }
            (Scheme::Loop, PatchType::GregoryTriangle) => {
                GregoryTriConverter::new(source).convert(matrix)
            }
            (Scheme::Loop, PatchType::Loop) => convert_to_box_spline(source, matrix),
            (Scheme::Loop, PatchType::Triangles) => {
                convert_to_linear::<LoopLimits, R>(source, matrix)
            }
            (scheme, patch_type) => {
                return Err(Error::UnsupportedPatchType { scheme, patch_type });
            }
        }

        debug_assert_eq!(matrix.row_count(), patch_type.control_vertex_count());
        Ok(matrix.row_count())
    }

    /// Converts every patch in `sources` to `patch_type`.
    ///
    /// # Errors
    ///
    /// Fails on the first patch [`convert_to_patch_type()`](Self::convert_to_patch_type)
    /// fails for.
    pub fn convert_patches<R: Real>(
        &self,
        sources: &[SourcePatch],
        patch_type: PatchType,
    ) -> Result<Vec<SparseMatrix<R>>> {
        sources
            .iter()
            .map(|source| {
                let mut matrix = SparseMatrix::new();
                self.convert_to_patch_type(source, patch_type, &mut matrix)?;
                Ok(matrix)
            })
            .collect()
    }

    /// Parallel version of [`convert_patches()`](Self::convert_patches).
    ///
    /// This method is only available when the `rayon` feature is enabled.
    #[cfg(feature = "rayon")]
    pub fn convert_patches_par<R: Real>(
        &self,
        sources: &[SourcePatch],
        patch_type: PatchType,
    ) -> Result<Vec<SparseMatrix<R>>> {
        sources
            .par_iter()
            .map(|source| {
                let mut matrix = SparseMatrix::new();
                self.convert_to_patch_type(source, patch_type, &mut matrix)?;
                Ok(matrix)
            })
            .collect()
    }
}

fn patch_type_from_basis(scheme: Scheme, basis: BasisType) -> PatchType {
    match (scheme, basis) {
        (Scheme::CatmullClark, BasisType::Regular) => PatchType::Regular,
        (Scheme::CatmullClark, BasisType::Gregory) => PatchType::GregoryBasis,
        (Scheme::CatmullClark, BasisType::Linear) => PatchType::Quads,
        (Scheme::Loop, BasisType::Regular) => PatchType::Loop,
        (Scheme::Loop, BasisType::Gregory) => PatchType::GregoryTriangle,
        (Scheme::Loop, BasisType::Linear) => PatchType::Triangles,
        _ => PatchType::NonPatch,
    }
}

/// Converts `source` to a linear patch: each corner is replaced by its limit
/// position.
///
/// Sharp corners interpolate. Smooth boundary corners only depend on their
/// two boundary neighbors.
fn convert_to_linear<L: LimitWeights, R: Real>(source: &SourcePatch, matrix: &mut SparseMatrix<R>) {
    let corner_count = source.corner_count();

    let mut row_sizes = [0; 4];
    let mut has_val2_interior = false;
    for (c, corner) in source.corners().iter().enumerate() {
        row_sizes[c] = if corner.sharp {
            1
        } else if corner.boundary {
            3
        } else {
            1 + source.corner_ring_size(c)
        };
        has_val2_interior |= corner.val2_interior;
    }
    matrix.resize_with_row_sizes(source.point_count(), &row_sizes[..corner_count]);

    let mut ring = vec![0; source.max_ring_size()];
    let mut weights = Vec::new();

    for (c, corner) in source.corners().iter().enumerate() {
        let mut row = matrix.row_mut(c);

        if corner.sharp {
            row.assign(0, c, R::ONE);
            continue;
        }

        let ring_size = source.corner_ring_points(c, &mut ring);
        if corner.boundary {
            let valence = 1 + corner.num_faces;
            weights.resize(L::boundary_ring_width(valence), R::ZERO);
            L::boundary_point_weights(valence, corner.patch_face, &mut weights, None);

            row.assign(0, c, weights[0]);
            row.assign(1, ring[0], weights[1]);
            row.assign(2, ring[ring_size - 1], weights[ring_size]);
        } else {
            weights.resize(L::interior_ring_width(corner.num_faces), R::ZERO);
            L::interior_point_weights(corner.num_faces, corner.patch_face, &mut weights, None);

            row.assign(0, c, weights[0]);
            for (i, &point) in ring[..ring_size].iter().enumerate() {
                row.assign(1 + i, point, weights[1 + i]);
            }
        }
    }

    if has_val2_interior {
        log::trace!("linear: merging valence-2 duplicates");
        matrix.remove_valence2_duplicates(corner_count);
    }
}
