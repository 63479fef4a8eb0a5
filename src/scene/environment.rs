//! Equirectangular HDR environment maps.

/// Linear-light equirectangular environment map, used for reflections and
/// diffuse lighting but not drawn as a background.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    width: u32,
    height: u32,
    /// `width * height` RGBA texels, row-major, top row = +Y.
    texels: Vec<[f32; 4]>,
}

impl EnvironmentMap {
    /// Map from `width * height` row-major texels.
    ///
    /// Returns `None` for a zero dimension or a texel count that does not
    /// match the dimensions.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        texels: Vec<[f32; 4]>,
    ) -> Option<Self> {
        let expected =
            usize::try_from(u64::from(width) * u64::from(height)).ok()?;
        (expected > 0 && texels.len() == expected).then_some(Self {
            width,
            height,
            texels,
        })
    }

    /// Width in pixels (longitude).
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (latitude).
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA texels, top row = +Y.
    #[must_use]
    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Single-texel map of one color.
    #[must_use]
    pub fn uniform(color: [f32; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![[color[0], color[1], color[2], 1.0]],
        }
    }

    /// Mean color over all texels, weighted by the solid angle of each row.
    ///
    /// Rows near the poles cover less of the sphere, so they count less.
    #[must_use]
    pub fn average_radiance(&self) -> [f32; 3] {
        if self.texels.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0_f64; 3];
        let mut weight_sum = 0.0_f64;
        for (row_index, row) in
            self.texels.chunks(self.width as usize).enumerate()
        {
            let latitude = ((row_index as f64 + 0.5) / f64::from(self.height)
                - 0.5)
                * std::f64::consts::PI;
            let weight = latitude.cos();
            for texel in row {
                for (acc, &c) in sum.iter_mut().zip(texel.iter()) {
                    *acc += f64::from(c) * weight;
                }
                weight_sum += weight;
            }
        }
        if weight_sum <= 0.0 {
            return [0.0; 3];
        }
        sum.map(|c| (c / weight_sum) as f32)
    }

    /// Half-resolution copy (2x2 box filter), used for the mip chain.
    ///
    /// Dimensions halve rounding down, matching GPU mip sizes; edge texels
    /// are reused for missing neighbours. A 1x1 map is returned unchanged.
    #[must_use]
    pub fn downsampled(&self) -> Self {
        if (self.width <= 1 && self.height <= 1) || self.texels.is_empty() {
            return self.clone();
        }
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let texel = |x: u32, y: u32| -> [f32; 4] {
            let x = x.min(self.width - 1);
            let y = y.min(self.height - 1);
            self.texels
                .get((y * self.width + x) as usize)
                .copied()
                .unwrap_or_default()
        };
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let samples = [
                    texel(2 * x, 2 * y),
                    texel(2 * x + 1, 2 * y),
                    texel(2 * x, 2 * y + 1),
                    texel(2 * x + 1, 2 * y + 1),
                ];
                let mut out = [0.0_f32; 4];
                for s in samples {
                    for (o, c) in out.iter_mut().zip(s) {
                        *o += c * 0.25;
                    }
                }
                texels.push(out);
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    /// This map followed by successively halved copies down to 1x1.
    #[must_use]
    pub fn mip_chain(&self) -> Vec<Self> {
        let mut chain = vec![self.clone()];
        while let Some(last) = chain.last() {
            if (last.width <= 1 && last.height <= 1) || last.texels.is_empty() {
                break;
            }
            let next = last.downsampled();
            chain.push(next);
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_map_averages_to_its_color() {
        let map = EnvironmentMap::uniform([0.5, 0.25, 1.0]);
        let avg = map.average_radiance();
        assert!((avg[0] - 0.5).abs() < 1e-6);
        assert!((avg[1] - 0.25).abs() < 1e-6);
        assert!((avg[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn polar_rows_weigh_less() {
        // Three rows: bright top, dark equator, bright bottom.
        let map = EnvironmentMap::new(
            1,
            3,
            vec![
                [1.0, 1.0, 1.0, 1.0],
                [0.0, 0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0, 1.0],
            ],
        )
        .unwrap();
        // Unweighted mean would be 2/3; cos-weighted rows give exactly 1/2.
        let avg = map.average_radiance();
        assert!((avg[0] - 0.5).abs() < 1e-6, "got {}", avg[0]);
    }

    #[test]
    fn downsample_averages_blocks() {
        let map = EnvironmentMap::new(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0, 1.0],
            ],
        )
        .unwrap();
        let half = map.downsampled();
        assert_eq!((half.width, half.height), (1, 1));
        assert_eq!(half.texels, vec![[0.5, 0.5, 0.5, 1.0]]);
    }

    #[test]
    fn mip_chain_ends_at_one_texel() {
        let map =
            EnvironmentMap::new(8, 3, vec![[2.0, 2.0, 2.0, 1.0]; 24]).unwrap();
        let chain = map.mip_chain();
        let sizes: Vec<(u32, u32)> =
            chain.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(sizes, vec![(8, 3), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(chain[3].texels, vec![[2.0, 2.0, 2.0, 1.0]]);
    }

    #[test]
    fn mismatched_texels_rejected() {
        assert!(EnvironmentMap::new(0, 0, Vec::new()).is_none());
        assert!(EnvironmentMap::new(4, 2, vec![[1.0; 4]; 3]).is_none());
        assert!(EnvironmentMap::new(2, 1, vec![[1.0; 4]; 3]).is_none());
        let map = EnvironmentMap::new(2, 1, vec![[1.0; 4]; 2]).unwrap();
        assert_eq!(map.mip_chain().len(), 2);
    }
}
