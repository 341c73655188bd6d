//! Tests for patch type selection and conversion dispatch.

mod utils;
use utils::*;

use anyhow::Result;
use opensubdiv_patch::far::{
    BasisType, PatchBuilder, PatchBuilderOptions, PatchType, SourcePatch, SparseMatrix,
};
use opensubdiv_patch::sdc::Scheme;
use opensubdiv_patch::{Error, Real};

fn builder(scheme: Scheme, irregular_basis: BasisType) -> PatchBuilder {
    PatchBuilder::new(
        scheme,
        PatchBuilderOptions {
            irregular_basis,
            ..Default::default()
        },
    )
    .expect("supported scheme")
}

#[test]
fn test_default_options() {
    let options = PatchBuilderOptions::default();
    assert_eq!(options.regular_basis, BasisType::Regular);
    assert_eq!(options.irregular_basis, BasisType::Unspecified);
}

#[test]
fn test_catmark_patch_types() {
    let builder = builder(Scheme::CatmullClark, BasisType::Unspecified);

    assert_eq!(builder.scheme(), Scheme::CatmullClark);
    assert_eq!(builder.regular_face_size(), 4);
    assert_eq!(builder.regular_patch_type(), PatchType::Regular);
    assert_eq!(builder.irregular_patch_type(), PatchType::Regular);
    assert_eq!(builder.native_patch_type(), PatchType::Regular);
    assert_eq!(builder.linear_patch_type(), PatchType::Quads);

    assert_eq!(builder.patch_type_from_basis(BasisType::Gregory), PatchType::GregoryBasis);
    assert_eq!(builder.patch_type_from_basis(BasisType::Linear), PatchType::Quads);
    assert_eq!(builder.patch_type_from_basis(BasisType::Bezier), PatchType::NonPatch);
}

#[test]
fn test_loop_patch_types() {
    let builder = builder(Scheme::Loop, BasisType::Linear);

    assert_eq!(builder.scheme(), Scheme::Loop);
    assert_eq!(builder.options().irregular_basis, BasisType::Linear);
    assert_eq!(builder.options().regular_basis, BasisType::Regular);
    assert_eq!(builder.regular_face_size(), 3);
    assert_eq!(builder.regular_patch_type(), PatchType::Loop);
    assert_eq!(builder.irregular_patch_type(), PatchType::Triangles);
    assert_eq!(builder.native_patch_type(), PatchType::Loop);
    assert_eq!(builder.linear_patch_type(), PatchType::Triangles);
    assert_eq!(builder.patch_type_from_basis(BasisType::Gregory), PatchType::GregoryTriangle);
}

#[test]
fn test_bilinear_is_unsupported() {
    assert!(matches!(
        PatchBuilder::new(Scheme::Bilinear, PatchBuilderOptions::default()),
        Err(Error::UnsupportedScheme(Scheme::Bilinear))
    ));
}

#[test]
fn test_unsupported_patch_types() {
    let mut matrix = SparseMatrix::<f64>::new();

    let catmark = builder(Scheme::CatmullClark, BasisType::Gregory);
    for patch_type in [PatchType::Loop, PatchType::GregoryTriangle, PatchType::NonPatch] {
        assert!(matches!(
            catmark.convert_to_patch_type(&regular_quad(), patch_type, &mut matrix),
            Err(Error::UnsupportedPatchType {
                scheme: Scheme::CatmullClark,
                ..
            })
        ));
    }

    let loop_ = builder(Scheme::Loop, BasisType::Gregory);
    assert!(matches!(
        loop_.convert_to_patch_type(&regular_triangle(), PatchType::GregoryBasis, &mut matrix),
        Err(Error::UnsupportedPatchType {
            scheme: Scheme::Loop,
            patch_type: PatchType::GregoryBasis,
        })
    ));
}

#[test]
fn test_wrong_face_size() {
    let mut matrix = SparseMatrix::<f32>::new();

    let catmark = builder(Scheme::CatmullClark, BasisType::Gregory);
    assert!(matches!(
        catmark.convert_to_patch_type(&regular_triangle(), PatchType::Regular, &mut matrix),
        Err(Error::InvalidSourcePatch(_))
    ));

    let loop_ = builder(Scheme::Loop, BasisType::Gregory);
    assert!(matches!(
        loop_.convert_to_patch_type(&regular_quad(), PatchType::Loop, &mut matrix),
        Err(Error::InvalidSourcePatch(_))
    ));
}

fn assert_row_counts<R: Real>(epsilon: f64) -> Result<()> {
    let cases = [
        (Scheme::CatmullClark, isolated_quad(5), PatchType::GregoryBasis, 20),
        (Scheme::CatmullClark, isolated_quad(5), PatchType::Regular, 16),
        (Scheme::CatmullClark, isolated_quad(5), PatchType::Quads, 4),
        (Scheme::Loop, isolated_triangle(5), PatchType::GregoryTriangle, 18),
        (Scheme::Loop, isolated_triangle(5), PatchType::Loop, 12),
        (Scheme::Loop, isolated_triangle(5), PatchType::Triangles, 3),
    ];

    let mut matrix = SparseMatrix::<R>::new();
    for (scheme, source, patch_type, expected) in cases {
        let builder = PatchBuilder::new(scheme, PatchBuilderOptions::default())?;
        let rows = builder.convert_to_patch_type(&source, patch_type, &mut matrix)?;

        assert_eq!(rows, expected, "{scheme} {patch_type}");
        assert_eq!(rows, patch_type.control_vertex_count());
        assert_eq!(matrix.column_count(), source.point_count());
        // The Box-spline table is given to six decimals.
        assert_rows_sum_to_one(&matrix, epsilon.max(1e-4));
    }
    Ok(())
}

#[test_log::test]
fn test_row_counts_f32() -> Result<()> {
    assert_row_counts::<f32>(EPSILON_F32)
}

#[test_log::test]
fn test_row_counts_f64() -> Result<()> {
    assert_row_counts::<f64>(EPSILON_F64)
}

#[test]
fn test_matrix_is_reused() -> Result<()> {
    let builder = PatchBuilder::new(Scheme::CatmullClark, PatchBuilderOptions::default())?;
    let mut matrix = SparseMatrix::<f64>::new();

    builder.convert_to_patch_type(&isolated_quad(7), PatchType::GregoryBasis, &mut matrix)?;
    builder.convert_to_patch_type(&regular_quad(), PatchType::Quads, &mut matrix)?;

    let mut fresh = SparseMatrix::new();
    builder.convert_to_patch_type(&regular_quad(), PatchType::Quads, &mut fresh)?;
    assert_eq!(matrix, fresh);
    Ok(())
}

fn mixed_quads() -> Vec<SourcePatch> {
    vec![
        regular_quad(),
        isolated_quad(3),
        isolated_quad(6),
        boundary_quad(),
        sharp_corner_quad(),
        val2_quad(),
    ]
}

#[test]
fn test_convert_patches() -> Result<()> {
    let builder = builder(Scheme::CatmullClark, BasisType::Gregory);
    let sources = mixed_quads();

    let matrices = builder.convert_patches::<f64>(&sources, builder.irregular_patch_type())?;
    assert_eq!(matrices.len(), sources.len());

    for (source, matrix) in sources.iter().zip(&matrices) {
        assert_eq!(matrix.row_count(), 20);
        assert_eq!(matrix.column_count(), source.point_count());
        assert_rows_sum_to_one(matrix, EPSILON_F64);
    }
    Ok(())
}

#[test]
fn test_convert_patches_fails_on_first_error() {
    let builder = builder(Scheme::CatmullClark, BasisType::Gregory);
    let sources = [regular_quad(), regular_triangle()];

    assert!(matches!(
        builder.convert_patches::<f32>(&sources, PatchType::GregoryBasis),
        Err(Error::InvalidSourcePatch(_))
    ));
}

#[cfg(feature = "rayon")]
#[test]
fn test_convert_patches_par() -> Result<()> {
    let builder = builder(Scheme::CatmullClark, BasisType::Gregory);
    let sources = mixed_quads();

    let serial = builder.convert_patches::<f64>(&sources, PatchType::Regular)?;
    let parallel = builder.convert_patches_par::<f64>(&sources, PatchType::Regular)?;
    assert_eq!(serial, parallel);
    Ok(())
}
