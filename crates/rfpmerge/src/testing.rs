//! Test fixtures built in code.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// Page width that identifies page `index` of the document tagged `marker`.
pub fn marker_width(marker: i64, index: usize) -> i64 {
    100 + marker * 10 + index as i64
}

/// Build a document with `pages` pages. Each page's MediaBox width encodes
/// `(marker, index)` so page identity survives a merge.
///
/// Fonts live on the parent `Pages` node, so pages inherit their resources.
pub fn marked_document(marker: i64, pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(pages);
    for index in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![20.into(), 400.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("doc {marker} page {index}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode test content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), marker_width(marker, index).into(), 500.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// A one-page document whose trailer points at an encryption dictionary.
pub fn encrypted_document() -> Document {
    let mut doc = marked_document(1, 1);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc
}

/// Build an unmarked document with `pages` pages.
pub fn sample_document(pages: usize) -> Document {
    marked_document(1, pages)
}

/// Serialize a sample document to bytes.
pub fn sample_pdf_bytes(pages: usize) -> Vec<u8> {
    marked_pdf_bytes(1, pages)
}

/// Serialize a marked document to bytes.
pub fn marked_pdf_bytes(marker: i64, pages: usize) -> Vec<u8> {
    let mut doc = marked_document(marker, pages);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test document");
    bytes
}

/// MediaBox widths of a document's pages, in page order.
pub fn page_widths(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(|obj| obj.as_array())
                .expect("MediaBox");
            media_box[2].as_float().expect("width") as i64
        })
        .collect()
}

/// Build a ZIP archive. Names ending in `/` become directory entries.
pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if let Some(dir) = name.strip_suffix('/') {
            writer
                .add_directory(dir, SimpleFileOptions::default())
                .expect("add directory");
        } else {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start file");
            writer.write_all(data).expect("write member");
        }
    }
    writer.finish().expect("finish archive").into_inner()
}

/// Build a single-member ZIP64 archive whose headers claim the member is
/// `declared` bytes long, whatever its real length.
pub fn zip_with_declared_size(name: &str, data: Vec<u8>, declared: u64) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::CompressionMethod;
    use zip::write::SimpleFileOptions;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(name, options).expect("start file");
    writer.write_all(&data).expect("write member");
    let mut bytes = writer.finish().expect("finish archive").into_inner();

    // ZIP64 extra field: tag 0x0001, length 16, then the uncompressed size.
    let mut field = vec![0x01, 0x00, 0x10, 0x00];
    field.extend_from_slice(&(data.len() as u64).to_le_bytes());
    let mut patched = 0;
    let mut offset = 0;
    while let Some(pos) = bytes[offset..].windows(field.len()).position(|w| w == field) {
        let start = offset + pos + 4;
        bytes[start..start + 8].copy_from_slice(&declared.to_le_bytes());
        offset = start + 8;
        patched += 1;
    }
    assert!(patched > 0, "archive has no ZIP64 size field");
    bytes
}
