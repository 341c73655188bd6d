//! Local topology of the source points around a patch.
//!
//! A [`SourcePatch`] describes a single quad or triangle of a subdivision mesh
//! together with the 1-rings of its corner vertices, without referencing a
//! mesh. Only the number of incident faces, the position of the patch face in
//! each corner's ring and a few tags per corner are needed. Source points are
//! numbered implicitly:
//!
//! 1. The corners of the face, `0..corner_count`.
//! 2. For each corner in turn, the points of its ring that are not shared
//!    with a neighboring corner (its *local* ring points).
//!
//! Two patches with the same [`SourcePatchCorner`]s therefore share the same
//! conversion matrix, whatever the actual mesh is.
use crate::{Error, Result};

/// Topological description of one corner of a [`SourcePatch`].
///
/// Only `boundary`, `sharp`, `dart`, `num_faces` and `patch_face` are input.
/// The remaining fields are derived by [`SourcePatch::new()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourcePatchCorner {
    /// The corner vertex is on a boundary.
    pub boundary: bool,
    /// The corner vertex is infinitely sharp (a corner or crease vertex).
    pub sharp: bool,
    /// The corner vertex is a dart, i.e. an interior vertex with a single
    /// incident crease edge.
    pub dart: bool,
    /// Number of faces incident to the corner vertex.
    pub num_faces: usize,
    /// Position of the patch face among the incident faces, counted
    /// counter-clockwise.
    pub patch_face: usize,

    /// Derived: interior vertex with exactly two faces.
    pub val2_interior: bool,
    /// Derived: a neighboring corner is a valence-2 interior vertex.
    pub val2_adjacent: bool,
    /// Derived: the ring shares a point with the ring of the previous corner.
    pub shares_with_prev: bool,
    /// Derived: the ring shares a point with the ring of the next corner.
    pub shares_with_next: bool,
}

impl SourcePatchCorner {
    /// Convenience constructor for the input fields.
    pub fn new(num_faces: usize, patch_face: usize, boundary: bool) -> Self {
        Self {
            boundary,
            num_faces,
            patch_face,
            ..Default::default()
        }
    }

    /// Returns the vertex valence: the number of incident edges.
    #[inline]
    pub fn valence(&self) -> usize {
        self.num_faces + self.boundary as usize
    }
}

/// A quad or triangle with the 1-rings of its corners.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourcePatch {
    corners: [SourcePatchCorner; 4],
    corner_count: usize,
    ring_sizes: [usize; 4],
    local_ring_sizes: [usize; 4],
    local_ring_offsets: [usize; 4],
    point_count: usize,
    max_valence: usize,
    max_ring_size: usize,
}

impl SourcePatch {
    /// Create a source patch from 3 (triangle) or 4 (quad) corners.
    ///
    /// The derived fields of the given corners are ignored and recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSourcePatch`] if the corners do not describe a
    /// consistent patch. Only the ring sizes are checked unless the
    /// `topology_validation` feature is enabled.
    pub fn new(corners: &[SourcePatchCorner]) -> Result<Self> {
        if !(3..=4).contains(&corners.len()) {
            return Err(Error::InvalidSourcePatch(format!(
                "a patch has 3 or 4 corners, got {}",
                corners.len()
            )));
        }

        #[cfg(feature = "topology_validation")]
        for (c, corner) in corners.iter().enumerate() {
            if 0 == corner.num_faces {
                return Err(Error::InvalidSourcePatch(format!(
                    "corner {c} has no incident faces"
                )));
            }
            if corner.patch_face >= corner.num_faces {
                return Err(Error::InvalidSourcePatch(format!(
                    "corner {c}: patch face {} out of range (faces: {})",
                    corner.patch_face, corner.num_faces
                )));
            }
        }

        let mut patch = SourcePatch {
            corner_count: corners.len(),
            ..Default::default()
        };
        patch.corners[..corners.len()].copy_from_slice(corners);
        patch.finalize()?;

        Ok(patch)
    }

    // Determines the ring sizes and the total number of source points. In
    // the process identifies which corners share ring points with their
    // neighbors.
    fn finalize(&mut self) -> Result<()> {
        let n = self.corner_count;
        let is_quad = 4 == n;
        let quad = is_quad as usize;

        self.max_valence = 0;
        self.max_ring_size = 0;
        self.point_count = n;

        let is_val2_interior = |c: &SourcePatchCorner| 2 == c.num_faces && !c.boundary;

        for c in 0..n {
            let c_prev = (c + 2 + quad) % n;
            let c_next = (c + 1) % n;

            let prev = self.corners[c_prev];
            let next = self.corners[c_next];
            let prev_val2 = is_val2_interior(&prev);
            let next_val2 = is_val2_interior(&next);

            let corner = &mut self.corners[c];
            corner.val2_interior = is_val2_interior(corner);
            corner.val2_adjacent = prev_val2 || next_val2;

            let (ring_size, local_ring_size) = if corner.valence() > 2 {
                // Triangles never share with prev: the local ring points are
                // necessarily asymmetric.
                if corner.boundary {
                    corner.shares_with_prev = is_quad && corner.patch_face != corner.num_faces - 1;
                    corner.shares_with_next = corner.patch_face != 0;
                } else if corner.dart {
                    let prev_on_dart_edge = prev.boundary && 0 == prev.patch_face;
                    let next_on_dart_edge =
                        next.boundary && next.patch_face + 1 == next.num_faces;

                    corner.shares_with_prev = is_quad && !prev_on_dart_edge;
                    corner.shares_with_next = !next_on_dart_edge;
                } else {
                    corner.shares_with_prev = is_quad;
                    corner.shares_with_next = true;
                }

                let ring_size = corner.num_faces * (1 + quad) + corner.boundary as usize;

                let mut shared = (n - 1)
                    + corner.shares_with_prev as usize
                    + corner.shares_with_next as usize;
                if corner.val2_adjacent {
                    shared += prev_val2 as usize + (next_val2 && is_quad) as usize;
                }

                let local_ring_size = ring_size.checked_sub(shared).ok_or_else(|| {
                    Error::InvalidSourcePatch(format!(
                        "corner {c}: ring of {ring_size} points cannot hold {shared} shared points"
                    ))
                })?;
                (ring_size, local_ring_size)
            } else {
                corner.shares_with_prev = false;
                corner.shares_with_next = false;

                // Single-face boundary/corner and valence-2 interior.
                if 1 == corner.num_faces {
                    (n - 1, 0)
                } else {
                    (2 * (1 + quad), quad)
                }
            };

            self.ring_sizes[c] = ring_size;
            self.local_ring_sizes[c] = local_ring_size;
            self.local_ring_offsets[c] = self.point_count;

            self.max_valence = self.max_valence.max(corner.valence());
            self.max_ring_size = self.max_ring_size.max(ring_size);

            self.point_count += local_ring_size;
        }

        log::trace!(
            "source patch: {n} corners, {} points, max valence {}",
            self.point_count,
            self.max_valence
        );

        Ok(())
    }

    /// Returns the number of corners: 4 for quads, 3 for triangles.
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.corner_count
    }

    /// Returns the corners of the patch.
    #[inline]
    pub fn corners(&self) -> &[SourcePatchCorner] {
        &self.corners[..self.corner_count]
    }

    /// Returns corner `c`.
    #[inline]
    pub fn corner(&self, c: usize) -> &SourcePatchCorner {
        &self.corners[c]
    }

    /// Returns the total number of source points: the corners plus all local
    /// ring points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Returns the largest valence of all corners.
    #[inline]
    pub fn max_valence(&self) -> usize {
        self.max_valence
    }

    /// Returns the size of the largest corner ring.
    #[inline]
    pub fn max_ring_size(&self) -> usize {
        self.max_ring_size
    }

    /// Returns the number of points in the 1-ring of corner `c`, excluding
    /// the corner itself.
    #[inline]
    pub fn corner_ring_size(&self, c: usize) -> usize {
        self.ring_sizes[c]
    }

    /// Returns the number of ring points of corner `c` not shared with any
    /// neighbor.
    #[inline]
    pub fn local_ring_size(&self, c: usize) -> usize {
        self.local_ring_sizes[c]
    }

    /// Returns the index of the first local ring point of corner `c`.
    #[inline]
    pub fn local_ring_offset(&self, c: usize) -> usize {
        self.local_ring_offsets[c]
    }

    /// Fills `ring_points` with the source point indices of the 1-ring of
    /// corner `c`, counter-clockwise and starting at the leading edge of the
    /// patch face. Returns the ring size.
    ///
    /// `ring_points` must hold at least
    /// [`corner_ring_size(c)`](Self::corner_ring_size) entries.
    pub fn corner_ring_points(&self, c: usize, ring_points: &mut [usize]) -> usize {
        let n = self.corner_count;
        let is_quad = 4 == n;
        let quad = is_quad as usize;

        let c_next = (c + 1) % n;
        let c_opp = (c + 1 + quad) % n;
        let c_prev = (c + 2 + quad) % n;

        let corner = &self.corners[c];
        let mut size = 0;
        let mut push = |point: usize| {
            ring_points[size] = point;
            size += 1;
        };

        // The ring is assembled with the other corners of the face first,
        // followed by the local ring. Shared and valence-2 compensating points
        // precede and follow the local points.
        push(c_next);
        if is_quad {
            push(c_opp);
        }
        push(c_prev);

        if self.corners[c_prev].val2_interior {
            push(if is_quad { c_opp } else { c_next });
        }
        if corner.shares_with_prev {
            push(self.local_ring_offsets[c_prev] + self.local_ring_sizes[c_prev] - 1);
        }

        for i in 0..self.local_ring_sizes[c] {
            push(self.local_ring_offsets[c] + i);
        }

        if is_quad {
            if corner.shares_with_next {
                push(self.local_ring_offsets[c_next]);
            }
            if self.corners[c_next].val2_interior {
                push(c_opp);
            }
        } else if corner.shares_with_next {
            if self.corners[c_next].val2_interior {
                push(c_prev);
            } else if 0 == self.local_ring_sizes[c_next] {
                push(self.local_ring_offsets[c_prev]);
            } else {
                push(self.local_ring_offsets[c_next]);
            }
        }
        debug_assert_eq!(size, self.ring_sizes[c]);

        // The assembled order starts with the patch face. Rotate it if the
        // patch face is not the first face of the corner.
        if 0 != corner.patch_face {
            let rotation = size - (1 + quad) * corner.patch_face;
            ring_points[..size].rotate_left(rotation);
        }
        size
    }

    /// Returns the 1-ring of corner `c` as a new vector.
    pub fn corner_ring(&self, c: usize) -> Vec<usize> {
        let mut ring = vec![0; self.ring_sizes[c]];
        self.corner_ring_points(c, &mut ring);
        ring
    }
}
