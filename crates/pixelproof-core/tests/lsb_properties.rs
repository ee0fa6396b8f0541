use pixelproof_core::media::{capacity, embed, extract, PixelBuffer};
use pixelproof_core::PixelProofError;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

fn random_buffer(rng: &mut StdRng, width: u32, height: u32) -> PixelBuffer {
    let mut channels = vec![0u8; (width * height * 3) as usize];
    rng.fill_bytes(&mut channels);
    PixelBuffer::from_raw(width, height, channels).expect("valid dimensions")
}

#[test]
fn should_round_trip_random_payloads_up_to_capacity() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let width = rng.gen_range(1..40);
        let height = rng.gen_range(1..40);
        let buffer = random_buffer(&mut rng, width, height);
        let max = capacity(buffer.len());
        let len = if max == 0 { 0 } else { rng.gen_range(0..=max) };
        let mut payload = vec![0u8; len];
        rng.fill_bytes(&mut payload);

        match embed(&buffer, &payload) {
            Ok(with_secret) => assert_eq!(extract(&with_secret).unwrap(), payload),
            // buffers with fewer than 32 channels cannot even carry the header
            Err(PixelProofError::CapacityExceeded { .. }) => assert!(buffer.len() < 32),
            Err(e) => panic!("unexpected error {e}"),
        }
    }
}

#[test]
fn should_be_deterministic_for_random_input() {
    let mut rng = StdRng::seed_from_u64(11);
    let buffer = random_buffer(&mut rng, 33, 21);
    let mut payload = vec![0u8; 100];
    rng.fill_bytes(&mut payload);

    let first = embed(&buffer, &payload).unwrap();
    let second = embed(&buffer, &payload).unwrap();
    assert_eq!(first, second);
}

/// A plain image decodes to an arbitrary 32-bit length. Only lengths up to the
/// capacity are plausible, for a 64x64 carrier that is 1532 of 2^32 values,
/// so a false extraction has a probability of roughly 3.6e-7 per image.
#[test]
fn should_not_extract_anything_from_random_images() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut false_extractions = 0;

    for _ in 0..1_000 {
        let buffer = random_buffer(&mut rng, 64, 64);
        match extract(&buffer) {
            Err(e) if e.is_corrupt_stream() => {}
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => false_extractions += 1,
        }
    }

    assert_eq!(false_extractions, 0);
}

#[test]
fn should_never_panic_on_arbitrary_carriers() {
    let mut rng = StdRng::seed_from_u64(3);

    for width in 1..12 {
        for height in 1..12 {
            let buffer = random_buffer(&mut rng, width, height);
            let _ = extract(&buffer);
        }
    }

    // worst case header: u32::MAX
    let saturated = PixelBuffer::from_raw(8, 8, vec![0xff; 192]).unwrap();
    assert!(extract(&saturated).unwrap_err().is_corrupt_stream());
}
