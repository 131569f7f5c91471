use std::fmt;

use crate::pixel_buffer::{CHANNELS, PixelBuffer};

/// Summary of one colour plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelStats {
    pub min: u8,
    pub max: u8,
    pub mean: f64,
}

/// Read-only summary of a buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    /// `(width, height)`
    pub size: (usize, usize),
    /// `(height, width, channels)`
    pub shape: (usize, usize, usize),
    /// R, G, B in that order.
    pub channels: [ChannelStats; CHANNELS],
}

impl Stats {
    pub fn of(buffer: &PixelBuffer) -> Self {
        let mut channels = [ChannelStats::default(); CHANNELS];
        for (c, slot) in channels.iter_mut().enumerate() {
            let plane = buffer.channel(c);
            if plane.is_empty() {
                continue;
            }
            let (mut min, mut max, mut sum) = (u8::MAX, u8::MIN, 0u64);
            for &v in plane.iter() {
                min = min.min(v);
                max = max.max(v);
                sum += u64::from(v);
            }
            *slot = ChannelStats {
                min,
                max,
                mean: sum as f64 / plane.len() as f64,
            };
        }

        let (height, width, depth) = buffer.shape();
        Self {
            size: (width, height),
            shape: (height, width, depth),
            channels,
        }
    }

    pub fn min_values(&self) -> [u8; CHANNELS] {
        self.channels.map(|c| c.min)
    }

    pub fn max_values(&self) -> [u8; CHANNELS] {
        self.channels.map(|c| c.max)
    }

    pub fn mean_values(&self) -> [f64; CHANNELS] {
        self.channels.map(|c| c.mean)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [mr, mg, mb] = self.mean_values();
        writeln!(f, "Size: {:?}", self.size)?;
        writeln!(f, "Array shape: {:?}", self.shape)?;
        writeln!(f, "Minimum RGB values: {:?}", self.min_values())?;
        writeln!(f, "Maximum RGB values: {:?}", self.max_values())?;
        write!(f, "Average RGB values: [{mr:.2}, {mg:.2}, {mb:.2}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_per_channel() {
        let buf = PixelBuffer::from_fn(2, 3, |y, x| [(y * 3 + x) as u8, 7, 255 - x as u8]);
        let stats = Stats::of(&buf);

        assert_eq!(stats.size, (3, 2));
        assert_eq!(stats.shape, (2, 3, 3));
        assert_eq!(stats.min_values(), [0, 7, 253]);
        assert_eq!(stats.max_values(), [5, 7, 255]);
        assert_eq!(stats.mean_values(), [2.5, 7.0, 254.0]);
    }

    #[test]
    fn test_stats_of_empty_buffer() {
        let buf = PixelBuffer::filled(0, 4, [1, 2, 3]);
        let stats = Stats::of(&buf);
        assert_eq!(stats.shape, (0, 4, 3));
        assert_eq!(stats.channels, [ChannelStats::default(); CHANNELS]);
    }

    #[test]
    fn test_display_rounds_means() {
        let buf = PixelBuffer::from_fn(1, 3, |_, x| [x as u8, 0, 0]);
        let text = Stats::of(&buf).to_string();
        assert!(text.contains("Size: (3, 1)"));
        assert!(text.contains("Array shape: (1, 3, 3)"));
        assert!(text.contains("Average RGB values: [1.00, 0.00, 0.00]"));
    }
}
