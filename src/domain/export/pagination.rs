//! Page-band pagination of a tall raster onto fixed-size pages.
//!
//! The raster is scaled to the page width, keeping its aspect ratio. Every
//! page shows the *same* scaled image, shifted upward by the height already
//! consumed, so page `n` displays band `n` of the image.

use thiserror::Error;

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Physical page width; the image is scaled to fill it.
    pub page_width_mm: f64,
    /// Physical page height (the media box).
    pub page_height_mm: f64,
    /// Height of image consumed per page.
    pub band_height_mm: f64,
}

impl PageGeometry {
    /// A4 portrait with a 295 mm band per page.
    pub const A4: PageGeometry = PageGeometry {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        band_height_mm: 295.0,
    };
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// When to start another page once the first page has been placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Continue while the remaining height is strictly positive.
    ///
    /// Any leftover slice, however thin, gets its own page; an image that
    /// ends exactly on a band boundary does not produce a blank page.
    #[default]
    SkipEmptyTail,
    /// Continue while the remaining height is zero or positive.
    ///
    /// Matches the legacy exporter byte for byte, including the trailing
    /// blank page for images that end exactly on a band boundary.
    EmitZeroRemainderPage,
}

impl TailPolicy {
    fn continues(self, remaining_mm: f64) -> bool {
        match self {
            TailPolicy::SkipEmptyTail => remaining_mm > 0.0,
            TailPolicy::EmitZeroRemainderPage => remaining_mm >= 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Raster has zero size ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("Page geometry must be positive")]
    InvalidGeometry,
}

/// Placement of the scaled image on each page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    geometry: PageGeometry,
    image_width_mm: f64,
    image_height_mm: f64,
    /// Vertical offset of the image's top edge from each page's top edge.
    /// Zero for the first page, negative afterwards.
    offsets_mm: Vec<f64>,
}

impl PagePlan {
    /// Computes the page placements for a raster of the given pixel size.
    pub fn compute(
        raster_width: u32,
        raster_height: u32,
        geometry: PageGeometry,
        policy: TailPolicy,
    ) -> Result<Self, PaginationError> {
        if raster_width == 0 || raster_height == 0 {
            return Err(PaginationError::EmptyRaster {
                width: raster_width,
                height: raster_height,
            });
        }
        if geometry.page_width_mm <= 0.0
            || geometry.page_height_mm <= 0.0
            || geometry.band_height_mm <= 0.0
        {
            return Err(PaginationError::InvalidGeometry);
        }

        let image_width_mm = geometry.page_width_mm;
        let image_height_mm =
            f64::from(raster_height) * geometry.page_width_mm / f64::from(raster_width);

        let mut offsets_mm = vec![0.0];
        let mut remaining_mm = image_height_mm - geometry.band_height_mm;

        while policy.continues(remaining_mm) {
            offsets_mm.push(remaining_mm - image_height_mm);
            remaining_mm -= geometry.band_height_mm;
        }

        Ok(Self {
            geometry,
            image_width_mm,
            image_height_mm,
            offsets_mm,
        })
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn image_width_mm(&self) -> f64 {
        self.image_width_mm
    }

    pub fn image_height_mm(&self) -> f64 {
        self.image_height_mm
    }

    pub fn page_count(&self) -> usize {
        self.offsets_mm.len()
    }

    pub fn offsets_mm(&self) -> &[f64] {
        &self.offsets_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 840px wide scales by exactly 0.25 mm/px onto a 210 mm page,
    // so 1180px is exactly one 295 mm band.
    const WIDTH: u32 = 840;
    const ONE_BAND: u32 = 1180;

    fn plan(height: u32, policy: TailPolicy) -> PagePlan {
        PagePlan::compute(WIDTH, height, PageGeometry::A4, policy).unwrap()
    }

    #[test]
    fn scales_height_by_page_width_ratio() {
        let p = plan(2000, TailPolicy::default());
        assert_eq!(p.image_width_mm(), 210.0);
        assert_eq!(p.image_height_mm(), 500.0);
    }

    #[test]
    fn short_image_yields_single_page() {
        let p = plan(400, TailPolicy::default());
        assert_eq!(p.page_count(), 1);
        assert_eq!(p.offsets_mm(), &[0.0]);
    }

    #[test]
    fn exact_band_height_yields_one_page() {
        assert_eq!(plan(ONE_BAND, TailPolicy::SkipEmptyTail).page_count(), 1);
    }

    #[test]
    fn band_height_plus_epsilon_yields_two_pages() {
        // 2px = 0.5 mm past the band
        let p = plan(ONE_BAND + 2, TailPolicy::SkipEmptyTail);
        assert_eq!(p.page_count(), 2);
        assert_eq!(p.offsets_mm(), &[0.0, -295.0]);
    }

    #[test]
    fn legacy_policy_emits_page_for_zero_remainder() {
        assert_eq!(plan(ONE_BAND, TailPolicy::EmitZeroRemainderPage).page_count(), 2);
        assert_eq!(plan(ONE_BAND + 2, TailPolicy::EmitZeroRemainderPage).page_count(), 2);
        assert_eq!(plan(400, TailPolicy::EmitZeroRemainderPage).page_count(), 1);
    }

    #[test]
    fn offsets_shift_by_consumed_height() {
        // 500 mm image: 295 on page one, 205 on page two
        let p = plan(2000, TailPolicy::default());
        assert_eq!(p.offsets_mm(), &[0.0, -295.0]);

        // 1000 mm image: four pages
        let p = plan(4000, TailPolicy::default());
        assert_eq!(p.offsets_mm(), &[0.0, -295.0, -590.0, -885.0]);
    }

    #[test]
    fn rejects_empty_raster() {
        let err = PagePlan::compute(0, 100, PageGeometry::A4, TailPolicy::default()).unwrap_err();
        assert_eq!(err, PaginationError::EmptyRaster { width: 0, height: 100 });
    }

    #[test]
    fn rejects_non_positive_geometry() {
        let geometry = PageGeometry {
            band_height_mm: 0.0,
            ..PageGeometry::A4
        };
        assert_eq!(
            PagePlan::compute(10, 10, geometry, TailPolicy::default()).unwrap_err(),
            PaginationError::InvalidGeometry
        );
    }

    proptest! {
        #[test]
        fn pages_cover_the_whole_image(width in 1u32..4000, height in 1u32..40000) {
            let p = PagePlan::compute(width, height, PageGeometry::A4, TailPolicy::default())
                .unwrap();
            let band = PageGeometry::A4.band_height_mm;
            let covered = band * p.page_count() as f64;
            prop_assert!(covered + 1e-6 >= p.image_height_mm());
            // No page starts past the end of the image.
            for offset in p.offsets_mm() {
                prop_assert!(-offset < p.image_height_mm());
            }
        }

        #[test]
        fn legacy_policy_never_emits_fewer_pages(width in 1u32..4000, height in 1u32..40000) {
            let strict =
                PagePlan::compute(width, height, PageGeometry::A4, TailPolicy::SkipEmptyTail)
                    .unwrap();
            let legacy = PagePlan::compute(
                width,
                height,
                PageGeometry::A4,
                TailPolicy::EmitZeroRemainderPage,
            )
            .unwrap();
            prop_assert!(legacy.page_count() >= strict.page_count());
            prop_assert!(legacy.page_count() <= strict.page_count() + 1);
        }
    }
}
