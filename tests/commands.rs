use ipmi_inventory::commands::{
    ChassisControlCommand, ClearSel, Command, GetChassisStatus, GetDeviceId, GetSelEntry,
    GetSelInfo, GetSelfTestResults, ReadFruData, ReserveSel, WistronI2c,
};
use ipmi_inventory::sel::{RecordId, Reservation};
use ipmi_inventory::{
    ChassisControl, CompletionCode, Error, PowerRestorePolicy, RawResponse, SelfTestResult,
};

fn ok(data: Vec<u8>) -> RawResponse {
    RawResponse {
        completion_code: 0x00,
        data,
    }
}

#[test]
fn get_device_id_parses_response() {
    let response = ok(vec![
        0x20, 0x01, 0x02, 0x43, 0x02, 0x00, 0xA2, 0x02, 0x00, 0x00, 0x01, 0x00, 0x06, 0x2B, 0x2B,
    ]);

    let parsed = GetDeviceId.parse_response(response).expect("parse");
    assert_eq!(parsed.device_id, 0x20);
    assert_eq!(parsed.device_revision, 0x01);
    assert_eq!(parsed.firmware_major, 0x02);
    assert_eq!(parsed.firmware_minor, 0x43);
    assert_eq!(parsed.ipmi_version, 0x02);
    assert_eq!(parsed.manufacturer_id, 0x0000_02A2);
    assert_eq!(parsed.product_id, 0x0100);
    assert_eq!(parsed.aux_firmware_revision, Some([0x00, 0x06, 0x2B, 0x2B]));
}

#[test]
fn completion_code_is_reported() {
    let response = RawResponse {
        completion_code: 0xC1,
        data: vec![0xAA, 0xBB],
    };

    let err = GetSelfTestResults
        .parse_response(response)
        .expect_err("expected error");
    assert!(matches!(
        err,
        Error::CompletionCode {
            command: "Get Self Test Results",
            code: CompletionCode::InvalidCommand,
        }
    ));
    assert_eq!(err.completion_code().map(CompletionCode::as_u8), Some(0xC1));
}

#[test]
fn unknown_completion_code_is_preserved() {
    let response = RawResponse {
        completion_code: 0x83,
        data: vec![],
    };
    let err = ReserveSel.parse_response(response).expect_err("expected error");
    assert_eq!(err.completion_code(), Some(CompletionCode::Unknown(0x83)));
}

#[test]
fn short_response_carries_hex_dump() {
    let err = GetSelInfo
        .parse_response(ok(vec![0x51, 0x02, 0xAB]))
        .expect_err("expected error");
    let Error::MalformedResponse {
        command,
        expected,
        actual,
        data,
    } = err
    else {
        panic!("expected malformed response");
    };
    assert_eq!(command, "Get SEL Info");
    assert_eq!(expected, 14);
    assert_eq!(actual, 3);
    assert_eq!(data, "5102ab");
}

#[test]
fn get_chassis_status_parses_response() {
    let status = GetChassisStatus
        .parse_response(ok(vec![0x41, 0x10, 0x08]))
        .expect("parse");
    assert!(status.power_on);
    assert_eq!(status.restore_policy, PowerRestorePolicy::AlwaysOn);
    assert_eq!(status.last_power_event, 0x10);
    assert!(status.cooling_fault);
    assert!(!status.intrusion);
}

#[test]
fn chassis_control_encodes_request() {
    let cmd = ChassisControlCommand {
        control: ChassisControl::PowerCycle,
    };
    assert_eq!(cmd.encode(), vec![0x00, 0x02, 0x02]);
    cmd.parse_response(ok(vec![])).expect("parse");
}

#[test]
fn self_test_results_decode_failures() {
    let result = GetSelfTestResults
        .parse_response(ok(vec![0x55, 0x00]))
        .expect("parse");
    assert_eq!(result, SelfTestResult::Passed);

    let result = GetSelfTestResults
        .parse_response(ok(vec![0x57, 0xA0]))
        .expect("parse");
    let SelfTestResult::DeviceError(detail) = result else {
        panic!("expected device error");
    };
    assert!(detail.sel_access_error());
    assert!(detail.fru_access_error());
    assert_eq!(
        detail.to_string(),
        "Cannot access BMC FRU device, Cannot access SEL device"
    );
}

#[test]
fn read_fru_data_exact_length() {
    let cmd = ReadFruData {
        device_id: 0,
        lun: 0,
        offset: 0,
        count: 16,
    };
    let mut data = vec![16u8];
    data.extend(0..16u8);
    let chunk = cmd.parse_response(ok(data)).expect("parse");
    assert_eq!(chunk.count, 16);
    assert_eq!(chunk.data, (0..16u8).collect::<Vec<_>>());
}

#[test]
fn read_fru_data_short_response_is_accepted() {
    let cmd = ReadFruData {
        device_id: 0,
        lun: 0,
        offset: 32,
        count: 16,
    };
    let chunk = cmd
        .parse_response(ok(vec![3, 0xDE, 0xAD, 0xBE]))
        .expect("parse");
    assert_eq!(chunk.data, vec![0xDE, 0xAD, 0xBE]);
    assert_eq!(cmd.request_data(), vec![0x00, 0x20, 0x00, 0x10]);
}

#[test]
fn get_sel_entry_requests_whole_record() {
    let cmd = GetSelEntry::whole(Reservation::new(0x0102), RecordId::FIRST);
    assert_eq!(cmd.encode(), vec![0x28, 0x43, 0x02, 0x01, 0x00, 0x00, 0x00, 0xFF]);
}

#[test]
fn clear_sel_initiate_and_status() {
    let reservation = Reservation::new(0xBEEF);
    assert_eq!(
        ClearSel::initiate(reservation).request_data(),
        vec![0xEF, 0xBE, b'C', b'L', b'R', 0xAA]
    );
    assert_eq!(
        ClearSel::status(reservation).request_data(),
        vec![0xEF, 0xBE, b'C', b'L', b'R', 0x00]
    );

    let progress = ClearSel::status(reservation)
        .parse_response(ok(vec![0x01]))
        .expect("parse");
    assert!(progress.is_completed());
}

#[test]
fn wistron_i2c_read_is_opaque() {
    let cmd = WistronI2c {
        bus: 2,
        address: 0xA0,
        read_count: 4,
        offset: 0x10,
        write: Vec::new(),
    };
    assert_eq!(cmd.encode(), vec![0xC0, 0x25, 0x02, 0xA0, 0x04, 0x10]);
    let data = cmd
        .parse_response(ok(vec![0xDE, 0xAD, 0xBE, 0xEF]))
        .expect("parse");
    assert_eq!(data, vec![0xDE, 0xAD, 0xBE, 0xEF]);
}
