use criterion::{criterion_group, criterion_main, Criterion};
use image::{ImageBuffer, Rgb, RgbImage};
use pixelproof_core::media::{embed, PixelBuffer};

pub fn image_embedding(c: &mut Criterion) {
    c.bench_function("Image Embedding", |b| {
        let image: RgbImage =
            ImageBuffer::from_fn(512, 512, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
        let plain = PixelBuffer::from_rgb_image(image);
        let secret = b"ABCD1234abcd5678";

        b.iter(|| embed(&plain, &secret[..]).expect("Cannot embed secret"))
    });
}

criterion_group!(benches, image_embedding);
criterion_main!(benches);
