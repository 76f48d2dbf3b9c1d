/// Prompt variation
///
/// Every image in a batch gets its own seed plus one modifier from each
/// style category, so identical base prompts still produce a varied set.

use rand::Rng;
use std::ops::RangeInclusive;

/// Shot framing modifiers
pub const FRAMING: [&str; 4] = [
    "dynamic wide-angle shot",
    "low-angle perspective",
    "high-angle perspective",
    "close-up macro",
];

/// Lighting modifiers
pub const LIGHTING: [&str; 4] = [
    "cinematic volumetric lighting",
    "soft studio lighting",
    "dramatic neon light",
    "sunset golden hour",
];

/// Mood and style modifiers
pub const MOOD: [&str; 4] = [
    "vibrant colors and detailed",
    "monochromatic moody atmosphere",
    "futuristic aesthetic",
    "minimalist and clean",
];

/// Appended to every prompt
pub const QUALITY_SUFFIX: &str =
    "professional photography, octane render, trending on artstation, ultra quality, 8k";

pub const SEED_RANGE: RangeInclusive<u32> = 1_000_000..=9_999_999;

/// The randomized part of one image's prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptVariation {
    pub framing: &'static str,
    pub lighting: &'static str,
    pub mood: &'static str,
    pub seed: u32,
}

impl PromptVariation {
    /// Draw a seed and one modifier per category, independently and uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let seed = rng.gen_range(SEED_RANGE);
        Self {
            framing: pick(rng, &FRAMING),
            lighting: pick(rng, &LIGHTING),
            mood: pick(rng, &MOOD),
            seed,
        }
    }

    /// Build the final prompt text sent to the image service
    pub fn apply(&self, base_prompt: &str) -> String {
        format!(
            "{}, {}, {}, {}, {}, seed:{}",
            base_prompt, self.framing, self.lighting, self.mood, QUALITY_SUFFIX, self.seed
        )
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options[rng.gen_range(0..options.len())]
}
