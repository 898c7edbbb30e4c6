mod common;

use common::ScriptedSession;
use ipmi_inventory::fru::{
    BoardInfoArea, END_OF_FIELDS, FieldType, FieldValue, FruCommonHeader, FruField, FruInventory,
    ProductInfoArea, checksum, manufacture_date, read_fru_device,
};
use ipmi_inventory::{CompletionCode, Error, FruError};

fn info_area(fixed: &[u8], fields: &[&str]) -> Vec<u8> {
    let mut area = vec![0x01, 0x00];
    area.extend_from_slice(fixed);
    for field in fields {
        area.extend(FruField::ascii(field).expect("field").encode());
    }
    area.push(END_OF_FIELDS);
    while (area.len() + 1) % 8 != 0 {
        area.push(0x00);
    }
    area[1] = ((area.len() + 1) / 8) as u8;
    area.push(checksum(&area));
    area
}

fn header(board: u8, product: u8) -> Vec<u8> {
    let mut buf = vec![0x01, 0x00, 0x00, board, product, 0x00, 0x00];
    buf.push(checksum(&buf));
    buf
}

fn image() -> Vec<u8> {
    let board = info_area(
        &[0x00, 0x00, 0x00, 0x00],
        &["ACME", "Widget Board", "BRD-0042", "PN-7"],
    );
    let product = info_area(
        &[0x00],
        &["ACME", "Widget", "WG-1", "1.0", "SERIAL123", "TAG"],
    );
    let product_offset = (1 + board.len() / 8) as u8;
    let mut data = header(1, product_offset);
    data.extend(board);
    data.extend(product);
    data
}

fn read_reply(bytes: &[u8]) -> Vec<u8> {
    let mut reply = vec![bytes.len() as u8];
    reply.extend_from_slice(bytes);
    reply
}

/// Script the inventory size, the header read, and the rest in `step`-byte
/// replies.
fn script(image: &[u8], step: usize) -> ScriptedSession {
    let size = (image.len() as u16).to_le_bytes();
    let mut session = ScriptedSession::new()
        .ok(vec![size[0], size[1], 0x00])
        .ok(read_reply(&image[..8]));
    let mut offset = 8;
    while offset < image.len() {
        let end = (offset + step).min(image.len());
        session = session.ok(read_reply(&image[offset..end]));
        offset = end;
    }
    session
}

#[test]
fn every_header_bit_flip_is_rejected() {
    let valid = header(1, 2);
    FruCommonHeader::decode(&valid).expect("valid header");
    for byte in 0..8 {
        for bit in 0..8 {
            let mut corrupt = valid.clone();
            corrupt[byte] ^= 1 << bit;
            FruCommonHeader::decode(&corrupt).expect_err("corrupt header");
        }
    }
}

#[test]
fn product_serial_decodes_as_text() {
    let inventory = FruInventory::decode(&image()).expect("decode");
    let product = inventory.product.expect("product area");
    assert_eq!(
        product.serial_number(),
        Some(FieldValue::Text("SERIAL123".to_string()))
    );
    assert_eq!(product.name().as_ref().and_then(FieldValue::as_text), Some("Widget"));
    assert!(product.checksum_valid());

    let board = inventory.board.expect("board area");
    assert_eq!(
        board.serial_number(),
        Some(FieldValue::Text("BRD-0042".to_string()))
    );
    assert!(inventory.chassis.is_none());
}

#[test]
fn fields_stop_at_terminator() {
    let mut area = vec![0x01, 0x02, 0x00, 0xC2, b'O', b'K', END_OF_FIELDS];
    area.extend([0xC3, b'B', b'A', b'D', 0x00, 0x00, 0x00, 0x00]);
    area.truncate(15);
    area.push(checksum(&area));

    let product = ProductInfoArea::decode(&area).expect("decode");
    assert_eq!(product.fields.len(), 1);
    assert_eq!(product.manufacturer(), Some(FieldValue::Text("OK".to_string())));
}

#[test]
fn non_english_text_is_unsupported() {
    let area = info_area(&[0x02], &["Hersteller"]);
    let product = ProductInfoArea::decode(&area).expect("decode");
    assert_eq!(
        product.manufacturer(),
        Some(FieldValue::Unsupported {
            field_type: FieldType::Ascii8,
            raw: b"Hersteller".to_vec(),
        })
    );
}

#[test]
fn manufacture_date_counts_minutes_from_1996() {
    let format = |bytes| manufacture_date(bytes).format("%Y-%m-%d %H:%M:%S").to_string();
    assert_eq!(format([0x00, 0x00, 0x00]), "1996-01-01 00:00:00");
    assert_eq!(format([0x01, 0x00, 0x00]), "1996-01-01 00:01:00");
    assert_eq!(format([0xA0, 0x05, 0x00]), "1996-01-02 00:00:00");
}

#[test]
fn board_area_carries_manufacture_date() {
    let area = info_area(&[0x00, 0x3C, 0x00, 0x00], &["ACME"]);
    let board = BoardInfoArea::decode(&area).expect("decode");
    assert_eq!(
        board.manufactured.format("%H:%M").to_string(),
        "01:00"
    );
}

#[test]
fn oversized_field_is_rejected() {
    let err = FruField::ascii(&"x".repeat(64)).expect_err("too long");
    assert_eq!(err, FruError::FieldTooLong(64));
}

#[test]
fn assembles_inventory_from_short_reads() {
    let image = image();
    let mut session = script(&image, 10);

    let device = read_fru_device(&mut session, 0, 0, 16).expect("read");
    assert_eq!(device.data, image);
    assert_eq!(usize::from(device.size), image.len());
    assert_eq!(
        device.product().and_then(ProductInfoArea::serial_number),
        Some(FieldValue::Text("SERIAL123".to_string()))
    );
    assert_eq!(session.remaining(), 0);

    // Each read starts where the previous one ended.
    let offsets: Vec<u16> = session.requests[2..]
        .iter()
        .map(|req| u16::from_le_bytes([req.data[1], req.data[2]]))
        .collect();
    let expected: Vec<u16> = (0..offsets.len()).map(|i| 8 + 10 * i as u16).collect();
    assert_eq!(offsets, expected);
    assert!(session.requests[2..].iter().all(|req| req.data[3] <= 16));
}

#[test]
fn failed_chunk_keeps_collected_bytes() {
    let image = image();
    let size = (image.len() as u16).to_le_bytes();
    let mut session = ScriptedSession::new()
        .ok(vec![size[0], size[1], 0x00])
        .ok(read_reply(&image[..8]))
        .ok(read_reply(&image[8..24]))
        .code(0x81);

    let err = read_fru_device(&mut session, 0, 0, 16).expect_err("busy");
    let Error::FruRead {
        offset,
        collected,
        source,
    } = err
    else {
        panic!("expected partial read error");
    };
    assert_eq!(offset, 24);
    assert_eq!(collected, image[..24].to_vec());
    assert_eq!(source.completion_code(), Some(CompletionCode::FruDeviceBusy));
}

#[test]
fn empty_chunk_stops_assembly() {
    let image = image();
    let size = (image.len() as u16).to_le_bytes();
    let mut session = ScriptedSession::new()
        .ok(vec![size[0], size[1], 0x00])
        .ok(read_reply(&image[..8]))
        .ok(vec![0x00]);

    let err = read_fru_device(&mut session, 0, 0, 16).expect_err("empty read");
    assert!(matches!(
        err,
        Error::FruRead {
            offset: 8,
            ref source,
            ..
        } if matches!(**source, Error::Fru(FruError::EmptyRead(8)))
    ));
}

#[test]
fn bad_header_aborts_before_area_reads() {
    let mut image = image();
    image[7] ^= 0xFF;
    let mut session = script(&image, 16);

    let err = read_fru_device(&mut session, 0, 0, 16).expect_err("checksum");
    assert!(matches!(
        err,
        Error::Fru(FruError::HeaderChecksum { .. })
    ));
    assert_eq!(session.requests.len(), 2);
}

#[test]
fn fru_reads_address_the_device_lun() {
    let image = image();
    let mut session = script(&image, 16);
    read_fru_device(&mut session, 3, 1, 16).expect("read");
    assert!(session.requests.iter().all(|req| req.netfn_lun == 0x29));
    assert!(session.requests.iter().all(|req| req.data[0] == 3));
}
