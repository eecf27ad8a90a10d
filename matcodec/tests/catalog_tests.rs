//! Catalog and session behavior: append sequencing, type enforcement,
//! type caching, and rejection of unusable files.

use std::path::Path;

use matcodec::mat::{Level, MatClass, MatReader, MatType, MatWriter, VarSpec};
use matcodec::{
    Buffer, CodecOptions, CodecRegistry, ElementType, Error, MatFile, Mode, TypeInfo,
    MAT_CODEC_NAME,
};
use rstest::rstest;
use tempfile::tempdir;

fn frame(step: usize) -> Buffer {
    let values: Vec<f64> = (0..4).map(|i| (10 * step + i) as f64).collect();
    Buffer::from_elements(vec![2, 2], &values).unwrap()
}

fn ne_bytes<T: Copy, const N: usize>(values: &[T], encode: fn(T) -> [u8; N]) -> Vec<u8> {
    values.iter().flat_map(|&v| encode(v)).collect()
}

/// Write variables through the container layer, bypassing the session.
fn write_raw(path: &Path, vars: &[VarSpec<'_>]) {
    let mut writer = MatWriter::create(path, &CodecOptions::default()).unwrap();
    for var in vars {
        writer.write(var).unwrap();
    }
    writer.finish().unwrap();
}

// ============================================================================
// Append
// ============================================================================

#[test]
fn test_append_sequencing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frames.mat");

    // Enough appends that "array_10" sorts before "array_2" as a string.
    let mut file = MatFile::open(&path, Mode::Append).unwrap();
    for step in 0..12 {
        assert_eq!(file.append(&frame(step)).unwrap(), step);
    }
    assert_eq!(file.size(), 12);

    let check = |file: &MatFile| {
        for (position, entry) in file.catalog().iter().enumerate() {
            assert_eq!(entry.id, position);
            assert_eq!(entry.name, format!("array_{}", position));
            assert_eq!(entry.info, TypeInfo::new(ElementType::Float64, vec![2, 2]));
        }
    };
    check(&file);

    let mut reopened = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(reopened.size(), 12);
    check(&reopened);

    let mut back = Buffer::default();
    for step in [0, 2, 10, 11] {
        reopened.read(&mut back, step).unwrap();
        assert_eq!(back, frame(step));
    }
}

#[test]
fn test_append_to_existing_file_continues_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("continue.mat");

    let mut first = MatFile::open(&path, Mode::Append).unwrap();
    first.append(&frame(0)).unwrap();
    first.append(&frame(1)).unwrap();
    drop(first);

    let mut second = MatFile::open(&path, Mode::Append).unwrap();
    assert_eq!(second.append(&frame(2)).unwrap(), 2);
    assert_eq!(second.catalog().get(2).unwrap().name, "array_2");
}

#[rstest]
#[case::other_kind(Buffer::from_elements(vec![2, 2], &[1.0f32; 4]).unwrap())]
#[case::other_shape(Buffer::from_elements(vec![4], &[1.0f64; 4]).unwrap())]
#[case::transposed_shape(Buffer::from_elements(vec![1, 4], &[1.0f64; 4]).unwrap())]
fn test_append_type_mismatch(#[case] incompatible: Buffer) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mismatch.mat");

    let mut file = MatFile::open(&path, Mode::Append).unwrap();
    file.append(&frame(0)).unwrap();
    file.append(&frame(1)).unwrap();

    let result = file.append(&incompatible);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    assert_eq!(file.size(), 2);

    let reopened = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(reopened.size(), 2);
}

#[test]
fn test_write_resets_catalog() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reset.mat");

    let mut file = MatFile::open(&path, Mode::Append).unwrap();
    for step in 0..3 {
        file.append(&frame(step)).unwrap();
    }

    let single = Buffer::from_elements(vec![3], &[7i64, 8, 9]).unwrap();
    file.write(&single).unwrap();
    assert_eq!(file.size(), 1);
    assert_eq!(file.catalog().get(0).unwrap().name, "array");
    assert_eq!(file.type_info(), Some(single.info()));

    // The representative type now follows the overwritten array.
    assert!(matches!(
        file.append(&frame(9)),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(file.append(&single).unwrap(), 1);
    assert_eq!(file.catalog().get(1).unwrap().name, "array_1");

    let reopened = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(reopened.size(), 2);
}

#[test]
fn test_reload_sees_other_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.mat");

    let mut writer = MatFile::open(&path, Mode::Append).unwrap();
    writer.append(&frame(0)).unwrap();

    let mut reader = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(reader.size(), 1);

    writer.append(&frame(1)).unwrap();
    assert_eq!(reader.size(), 1);

    reader.reload().unwrap();
    assert_eq!(reader.size(), 2);
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_read_all_returns_first_variable_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("many.mat");

    let mut file = MatFile::open(&path, Mode::Append).unwrap();
    for step in 0..4 {
        file.append(&frame(step)).unwrap();
    }

    let mut back = Buffer::default();
    file.read_all(&mut back).unwrap();
    assert_eq!(back, frame(0));

    let mut reopened = MatFile::open(&path, Mode::Read).unwrap();
    reopened.read_all(&mut back).unwrap();
    assert_eq!(back, frame(0));
}

#[test]
fn test_index_bounds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bounds.mat");
    let mut back = Buffer::default();

    let mut file = MatFile::open(&path, Mode::Append).unwrap();
    assert!(matches!(
        file.read(&mut back, 0),
        Err(Error::IndexOutOfRange { index: 0, size: 0 })
    ));

    file.append(&frame(0)).unwrap();
    file.append(&frame(1)).unwrap();

    for index in [2, 3, 100] {
        assert!(matches!(
            file.read(&mut back, index),
            Err(Error::IndexOutOfRange { size: 2, .. })
        ));
    }
    file.read(&mut back, 1).unwrap();
    assert_eq!(back, frame(1));
}

#[test]
fn test_read_reshapes_buffer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reshape.mat");

    let mut file = MatFile::open(&path, Mode::Write).unwrap();
    file.write(&frame(3)).unwrap();

    let mut back = Buffer::from_elements(vec![5], &[0u8; 5]).unwrap();
    file.read(&mut back, 0).unwrap();
    assert_eq!(back.info(), frame(3).info());
    assert_eq!(back.to_vec::<f64>().unwrap(), vec![30.0, 31.0, 32.0, 33.0]);
}

// ============================================================================
// Type caching
// ============================================================================

/// A file whose first variable is `first` and whose second is `int8[3]`.
fn write_heterogeneous(path: &Path, first: VarSpec<'_>) {
    let bytes = ne_bytes(&[-1i8, 0, 1], i8::to_ne_bytes);

    write_raw(
        path,
        &[
            first,
            VarSpec {
                name: "second",
                class: MatClass::Int8,
                data_type: MatType::Int8,
                dims: &[3],
                real: &bytes,
                imag: None,
            },
        ],
    );
}

fn doubles_var(real: &[u8]) -> VarSpec<'_> {
    VarSpec {
        name: "first",
        class: MatClass::Double,
        data_type: MatType::Double,
        dims: &[2],
        real,
        imag: None,
    }
}

#[rstest]
#[case::double_first(ElementType::Float64)]
#[case::int32_first(ElementType::Int32)]
fn test_catalog_caches_first_type(#[case] first_kind: ElementType) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.mat");

    let ints = ne_bytes(&[7i32, -70_000], i32::to_ne_bytes);
    let doubles = ne_bytes(&[1.0f64, 2.0], f64::to_ne_bytes);
    let first = match first_kind {
        ElementType::Int32 => VarSpec {
            name: "first",
            class: MatClass::Int32,
            data_type: MatType::Int32,
            dims: &[2],
            real: &ints,
            imag: None,
        },
        _ => doubles_var(&doubles),
    };
    write_heterogeneous(&path, first);

    let mut file = MatFile::open(&path, Mode::Read).unwrap();
    let first_type = TypeInfo::new(first_kind, vec![2]);
    assert_eq!(file.size(), 2);
    for entry in file.catalog() {
        assert_eq!(entry.info, first_type);
    }

    // Reads still use the stored type of each variable.
    let mut back = Buffer::default();
    file.read(&mut back, 1).unwrap();
    assert_eq!(back.to_vec::<i8>().unwrap(), vec![-1, 0, 1]);

    file.read(&mut back, 0).unwrap();
    assert_eq!(back.info(), &first_type);
    match first_kind {
        ElementType::Int32 => assert_eq!(back.to_vec::<i32>().unwrap(), vec![7, -70_000]),
        _ => assert_eq!(back.to_vec::<f64>().unwrap(), vec![1.0, 2.0]),
    }
}

#[test]
fn test_verified_catalog_types() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.mat");
    let doubles = ne_bytes(&[1.0f64, 2.0], f64::to_ne_bytes);
    write_heterogeneous(&path, doubles_var(&doubles));

    let options = CodecOptions::new().verify_types(true);
    let file = MatFile::with_options(&path, Mode::Read, options).unwrap();
    let types: Vec<_> = file.catalog().iter().map(|e| e.info.to_string()).collect();
    assert_eq!(types, ["float64[2]", "int8[3]"]);
    assert_eq!(file.catalog().get(1).unwrap().name, "second");
}

// ============================================================================
// Unusable files
// ============================================================================

fn write_char_array(path: &Path) {
    let text = ne_bytes(&[b'a' as u16, b'b' as u16, b'c' as u16], u16::to_ne_bytes);
    write_raw(
        path,
        &[VarSpec {
            name: "label",
            class: MatClass::Char,
            data_type: MatType::UInt16,
            dims: &[1, 3],
            real: &text,
            imag: None,
        }],
    );
}

fn write_complex_int(path: &Path) {
    let part = ne_bytes(&[1i32, 2], i32::to_ne_bytes);
    write_raw(
        path,
        &[VarSpec {
            name: "z",
            class: MatClass::Int32,
            data_type: MatType::Int32,
            dims: &[2],
            real: &part,
            imag: Some(&part),
        }],
    );
}

fn write_five_dims(path: &Path) {
    write_raw(
        path,
        &[VarSpec {
            name: "cube",
            class: MatClass::UInt8,
            data_type: MatType::UInt8,
            dims: &[1, 1, 2, 1, 1],
            real: &[3, 4],
            imag: None,
        }],
    );
}

fn write_no_variables(path: &Path) {
    write_raw(path, &[]);
}

#[rstest]
#[case::char_array(write_char_array)]
#[case::complex_integer(write_complex_int)]
#[case::five_dimensions(write_five_dims)]
#[case::no_variables(write_no_variables)]
fn test_unusable_first_variable(#[case] make: fn(&Path)) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("unusable.mat");
    make(&path);

    assert!(matches!(
        MatFile::open(&path, Mode::Read),
        Err(Error::MalformedCatalog { .. })
    ));
    assert!(matches!(
        MatFile::open(&path, Mode::Append),
        Err(Error::MalformedCatalog { .. })
    ));

    // Write mode truncates before anything is read.
    let mut file = MatFile::open(&path, Mode::Write).unwrap();
    assert!(!path.exists());
    file.write(&frame(0)).unwrap();
    assert_eq!(MatFile::open(&path, Mode::Read).unwrap().size(), 1);
}

#[test]
fn test_later_unusable_variables_are_listed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tail.mat");

    let doubles = ne_bytes(&[5.0f64], f64::to_ne_bytes);
    let text = ne_bytes(&[b'x' as u16], u16::to_ne_bytes);
    write_raw(
        &path,
        &[
            VarSpec {
                name: "value",
                class: MatClass::Double,
                data_type: MatType::Double,
                dims: &[1],
                real: &doubles,
                imag: None,
            },
            VarSpec {
                name: "note",
                class: MatClass::Char,
                data_type: MatType::UInt16,
                dims: &[1, 1],
                real: &text,
                imag: None,
            },
        ],
    );

    let mut file = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(file.size(), 2);

    let mut back = Buffer::default();
    assert!(matches!(
        file.read(&mut back, 1),
        Err(Error::UnsupportedType { .. })
    ));
    file.read(&mut back, 0).unwrap();
    assert_eq!(back.to_vec::<f64>().unwrap(), vec![5.0]);
}

#[test]
fn test_not_a_mat_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mat");
    std::fs::write(&path, vec![0u8; 300]).unwrap();

    assert!(matches!(
        MatFile::open(&path, Mode::Read),
        Err(Error::InvalidFormat { .. })
    ));
}

// ============================================================================
// Level-4 files
// ============================================================================

/// Append one level-4 matrix; `le` selects the byte order of every field.
fn push_level4(
    out: &mut Vec<u8>,
    le: bool,
    mopt: i32,
    name: &str,
    (rows, cols): (i32, i32),
    parts: &[&[u8]],
) {
    let imag = i32::from(parts.len() == 2);
    let name_len = name.len() as i32 + 1;
    for field in [mopt, rows, cols, imag, name_len] {
        if le {
            out.extend_from_slice(&field.to_le_bytes());
        } else {
            out.extend_from_slice(&field.to_be_bytes());
        }
    }
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    for part in parts {
        out.extend_from_slice(part);
    }
}

#[test]
fn test_level4_little_endian() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.mat");

    // 2x3 matrices, column-major on disk.
    let real = ne_bytes(&[1.0f64, 4.0, 2.0, 5.0, 3.0, 6.0], f64::to_le_bytes);
    let imag = ne_bytes(&[-1.0f64, -4.0, -2.0, -5.0, -3.0, -6.0], f64::to_le_bytes);
    let mut raw = Vec::new();
    push_level4(&mut raw, true, 0, "x", (2, 3), &[&real]);
    push_level4(&mut raw, true, 0, "z", (2, 3), &[&real, &imag]);
    std::fs::write(&path, raw).unwrap();

    let reader = MatReader::open(&path).unwrap();
    assert_eq!(reader.level(), Level::V4);
    assert!(reader.header().is_none());

    let mut file = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(file.size(), 2);
    assert_eq!(
        file.type_info(),
        Some(&TypeInfo::new(ElementType::Float64, vec![2, 3]))
    );
    assert_eq!(file.catalog().get(1).unwrap().name, "z");

    let mut back = Buffer::default();
    file.read_all(&mut back).unwrap();
    assert_eq!(
        back.to_vec::<f64>().unwrap(),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );

    file.read(&mut back, 1).unwrap();
    assert_eq!(back.info().dtype, ElementType::Complex128);
    assert_eq!(
        back.to_vec::<[f64; 2]>().unwrap(),
        vec![
            [1.0, -1.0],
            [2.0, -2.0],
            [3.0, -3.0],
            [4.0, -4.0],
            [5.0, -5.0],
            [6.0, -6.0]
        ]
    );
}

#[test]
fn test_level4_big_endian_int16() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy_be.mat");

    let real = ne_bytes(&[-2i16, 300, 7], i16::to_be_bytes);
    let mut raw = Vec::new();
    push_level4(&mut raw, false, 1030, "counts", (1, 3), &[&real]);
    std::fs::write(&path, raw).unwrap();

    let mut file = MatFile::open(&path, Mode::Read).unwrap();
    assert_eq!(
        file.type_info(),
        Some(&TypeInfo::new(ElementType::Int16, vec![1, 3]))
    );

    let mut back = Buffer::default();
    file.read(&mut back, 0).unwrap();
    assert_eq!(back.to_vec::<i16>().unwrap(), vec![-2, 300, 7]);
}

#[test]
fn test_level4_append_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.mat");

    let real = ne_bytes(&[1.0f64, 2.0, 3.0, 4.0], f64::to_le_bytes);
    let mut raw = Vec::new();
    push_level4(&mut raw, true, 0, "x", (2, 2), &[&real]);
    std::fs::write(&path, &raw).unwrap();

    let mut file = MatFile::open(&path, Mode::Append).unwrap();
    assert!(matches!(
        file.append(&frame(0)),
        Err(Error::InvalidFormat { .. })
    ));
    assert_eq!(file.size(), 1);
    assert_eq!(std::fs::read(&path).unwrap(), raw);
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.MAT");
    let registry = CodecRegistry::default();

    let mut file = registry.open(&path, 'w').unwrap();
    assert_eq!(file.name(), MAT_CODEC_NAME);
    assert_eq!(file.filename(), path.as_path());
    file.write(&frame(4)).unwrap();
    assert_eq!(file.size(), 1);
    drop(file);

    let mut file = registry.open(&path, 'a').unwrap();
    assert_eq!(file.append(&frame(5)).unwrap(), 1);
    assert_eq!(file.type_all(), Some(frame(0).info()));

    let mut file = registry.open(&path, 'r').unwrap();
    let mut back = Buffer::default();
    file.read(&mut back, 1).unwrap();
    assert_eq!(back, frame(5));
    assert!(matches!(
        file.append(&frame(6)),
        Err(Error::ReadOnly { .. })
    ));
}
