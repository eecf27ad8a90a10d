//! Round-trip tests: arrays written to a file come back unchanged.

use matcodec::{
    Buffer, CodecOptions, Compression, Element, ElementType, Error, MatFile, Mode, Result,
};
use rstest::rstest;
use tempfile::tempdir;

/// A buffer of `shape` whose element at linear position `i` is `value(i)`.
fn ramp<T: Element>(shape: &[usize], value: impl Fn(usize) -> T) -> Buffer {
    let count: usize = shape.iter().product();
    let values: Vec<T> = (0..count).map(value).collect();
    Buffer::from_elements(shape.to_vec(), &values).unwrap()
}

/// Overwrite a fresh file with `buffer`, then read it back through a new
/// read-only session.
fn write_and_read_back(buffer: &Buffer, options: CodecOptions) -> Result<Buffer> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roundtrip.mat");

    let mut file = MatFile::with_options(&path, Mode::Write, options)?;
    file.write(buffer)?;
    assert_eq!(file.size(), 1);
    assert_eq!(file.type_info(), Some(buffer.info()));

    let mut reader = MatFile::open(&path, Mode::Read)?;
    assert_eq!(reader.type_info(), Some(buffer.info()));

    let mut back = Buffer::default();
    reader.read_all(&mut back)?;
    Ok(back)
}

// ============================================================================
// Real element types
// ============================================================================

#[rstest]
#[case::int8(ramp(&[7], |i| i as i8 - 3))]
#[case::int16(ramp(&[3, 4], |i| -(i as i16) * 300))]
#[case::int32(ramp(&[2, 3, 4], |i| i as i32 * 70_000 - 1))]
#[case::int32_1d(ramp(&[5], |i| [i32::MIN, -1, 0, 1, i32::MAX][i]))]
#[case::int32_2d(ramp(&[2, 3], |i| i as i32 - 3))]
#[case::int64(ramp(&[2, 3, 2, 3], |i| (i as i64) << 40))]
#[case::uint8(ramp(&[2, 3, 4], |i| (i * 7) as u8))]
#[case::uint16(ramp(&[5, 1], |i| i as u16 * 1000))]
#[case::uint32(ramp(&[1, 6], |i| u32::MAX - i as u32))]
#[case::uint64(ramp(&[4], |i| u64::MAX / (i as u64 + 1)))]
#[case::float32(ramp(&[3, 2], |i| i as f32 * 0.25 - 1.0))]
#[case::float64_1d(ramp(&[9], |i| (i as f64).sqrt()))]
#[case::float64_2d(ramp(&[2, 3], |i| i as f64 + 1.0))]
#[case::float64_3d(ramp(&[2, 3, 4], |i| i as f64 / 3.0))]
#[case::float64_4d(ramp(&[2, 3, 4, 5], |i| -(i as f64)))]
fn test_real_roundtrip(#[case] buffer: Buffer) {
    let back = write_and_read_back(&buffer, CodecOptions::default()).unwrap();
    assert_eq!(back, buffer);
}

#[rstest]
#[case::none(Compression::None)]
#[case::fast(Compression::Zlib(1))]
#[case::best(Compression::Zlib(9))]
fn test_roundtrip_with_compression(#[case] compression: Compression) {
    let options = CodecOptions::new().compression(compression);

    let buffer = ramp(&[4, 5, 6], |i| (i % 11) as f64);
    let back = write_and_read_back(&buffer, options.clone()).unwrap();
    assert_eq!(back, buffer);

    let buffer = ramp(&[10], |i| i as i32 * -1_000_000);
    let back = write_and_read_back(&buffer, options).unwrap();
    assert_eq!(back, buffer);
}

// ============================================================================
// Complex element types
// ============================================================================

#[rstest]
#[case::purely_real(|i: usize| [i as f64, 0.0])]
#[case::purely_imaginary(|i: usize| [0.0, -(i as f64)])]
#[case::mixed(|i: usize| [i as f64 * 0.5, 10.0 - i as f64])]
fn test_complex128_roundtrip(#[case] value: fn(usize) -> [f64; 2]) {
    let shapes: [&[usize]; 4] = [&[6], &[2, 3], &[2, 2, 3], &[1, 2, 3, 2]];
    for shape in shapes {
        let buffer = ramp(shape, value);
        assert_eq!(buffer.info().dtype, ElementType::Complex128);

        let back = write_and_read_back(&buffer, CodecOptions::default()).unwrap();
        assert_eq!(back.to_vec::<[f64; 2]>().unwrap(), buffer.to_vec::<[f64; 2]>().unwrap());
        assert_eq!(back.info(), buffer.info());
    }
}

#[rstest]
#[case::purely_real(|i: usize| [i as f32, 0.0])]
#[case::purely_imaginary(|i: usize| [0.0, i as f32 + 1.0])]
#[case::mixed(|i: usize| [-(i as f32), i as f32 * 2.0])]
fn test_complex64_roundtrip(#[case] value: fn(usize) -> [f32; 2]) {
    let buffer = ramp(&[3, 4], value);
    assert_eq!(buffer.info().dtype, ElementType::Complex64);

    let back = write_and_read_back(&buffer, CodecOptions::default()).unwrap();
    assert_eq!(back, buffer);
}

#[test]
fn test_complex_compressed_roundtrip() {
    let buffer = ramp(&[2, 5], |i| [i as f64, -(i as f64)]);
    let options = CodecOptions::new().compression(Compression::Zlib(6));
    let back = write_and_read_back(&buffer, options).unwrap();
    assert_eq!(back, buffer);
}

// ============================================================================
// Unsupported buffers
// ============================================================================

#[test]
fn test_unsupported_buffers_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rejected.mat");
    let mut file = MatFile::open(&path, Mode::Write).unwrap();

    let five_dims = ramp(&[1, 2, 1, 2, 1], |i| i as u8);
    assert!(file.write(&five_dims).is_err());

    let complex256 = Buffer::new(matcodec::TypeInfo::new(ElementType::Complex256, vec![2]));
    assert!(matches!(
        file.write(&complex256),
        Err(Error::UnsupportedType { .. })
    ));

    assert!(!path.exists());
    assert_eq!(file.size(), 0);
}
