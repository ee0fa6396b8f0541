use criterion::{criterion_group, criterion_main, Criterion};
use image::{ImageBuffer, Rgb, RgbImage};
use pixelproof_core::media::{embed, extract, PixelBuffer};

pub fn image_extraction(c: &mut Criterion) {
    c.bench_function("Image Extraction", |b| {
        let image: RgbImage =
            ImageBuffer::from_fn(512, 512, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
        let with_secret = embed(&PixelBuffer::from_rgb_image(image), b"ABCD1234abcd5678")
            .expect("Cannot embed secret");

        b.iter(|| extract(&with_secret).expect("Cannot extract secret"))
    });
}

criterion_group!(benches, image_extraction);
criterion_main!(benches);
