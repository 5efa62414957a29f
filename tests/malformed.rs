use vtp::decode::DecodeError;
use vtp::parse::{Block, Malformed, ParseError, PieceError};
use vtp::TopologyKind;

fn document(header: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<VTKFile type="PolyData" {header}>
  <PolyData>
    {body}
  </PolyData>
</VTKFile>"#
    )
}

const TRIANGLE: &str = r#"<Piece NumberOfPoints="3" NumberOfPolys="1">
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="ascii">0 0 0 1 0 0 0 1 0</DataArray>
      </Points>
      <Polys>
        <DataArray type="Int32" Name="connectivity" format="ascii">0 1 2</DataArray>
        <DataArray type="Int32" Name="offsets" format="ascii">3</DataArray>
      </Polys>
    </Piece>"#;

fn piece_error(xml: &str) -> PieceError {
    match vtp::parse_polydata(xml.as_bytes()) {
        Err(vtp::Error::Parse(ParseError::Piece(err))) => err,
        other => panic!("expected a piece error, got {other:?}"),
    }
}

#[test]
fn declared_polys_without_block() {
    let xml = document(
        "",
        r#"<Piece NumberOfPoints="0" NumberOfPolys="5"></Piece>"#,
    );

    let err = piece_error(&xml);
    assert_eq!(err.piece, 0);
    assert_eq!(err.block, Block::Cells(TopologyKind::Polys));
    assert!(matches!(err.reason, Malformed::MissingElement(_)));
}

#[test]
fn failure_in_a_later_piece_discards_everything() {
    let broken = r#"<Piece NumberOfPoints="2">
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="ascii">0 0 0</DataArray>
      </Points>
    </Piece>"#;
    let xml = document("", &format!("{TRIANGLE}{broken}{TRIANGLE}"));

    let err = piece_error(&xml);
    assert_eq!(err.piece, 1);
    assert_eq!(err.block, Block::Points);
    match err.reason {
        Malformed::ArrayDecode(decode) => assert!(matches!(
            decode.source,
            DecodeError::LengthMismatch {
                expected: 6,
                actual: 3
            }
        )),
        other => panic!("unexpected reason {other}"),
    }
}

#[test]
fn points_with_two_components() {
    let xml = document(
        "",
        r#"<Piece NumberOfPoints="2">
      <Points>
        <DataArray type="Float32" NumberOfComponents="2" format="ascii">0 0 1 1</DataArray>
      </Points>
    </Piece>"#,
    );

    let err = piece_error(&xml);
    assert!(matches!(err.reason, Malformed::InvalidComponents(_)));
}

#[test]
fn negative_count() {
    let xml = document("", r#"<Piece NumberOfPoints="-3"></Piece>"#);

    let err = piece_error(&xml);
    assert_eq!(err.block, Block::Points);
    assert!(matches!(err.reason, Malformed::InvalidCount(_)));
}

#[test]
fn point_data_with_wrong_tuple_count() {
    let xml = document(
        "",
        &TRIANGLE.replace(
            "<Points>",
            r#"<PointData><DataArray type="Float64" Name="p" format="ascii">1 2</DataArray></PointData><Points>"#,
        ),
    );

    let err = piece_error(&xml);
    assert_eq!(err.block, Block::PointData);
    match err.reason {
        Malformed::ArrayDecode(decode) => assert_eq!(decode.array_name, "p"),
        other => panic!("unexpected reason {other}"),
    }
}

#[test]
fn cell_data_uses_total_cell_count() {
    // one polygon, but the cell array has two values
    let xml = document(
        "",
        &TRIANGLE.replace(
            "<Points>",
            r#"<CellData><DataArray type="Int32" Name="id" format="ascii">1 2</DataArray></CellData><Points>"#,
        ),
    );

    let err = piece_error(&xml);
    assert_eq!(err.block, Block::CellData);
}

#[test]
fn offsets_must_not_decrease() {
    let xml = document(
        "",
        r#"<Piece NumberOfPoints="0" NumberOfLines="2">
      <Lines>
        <DataArray type="Int32" Name="connectivity" format="ascii">0</DataArray>
        <DataArray type="Int32" Name="offsets" format="ascii">3 1</DataArray>
      </Lines>
    </Piece>"#,
    );

    let err = piece_error(&xml);
    assert_eq!(err.block, Block::Cells(TopologyKind::Lines));
    match err.reason {
        Malformed::ArrayDecode(decode) => {
            assert!(matches!(decode.source, DecodeError::InvalidOffsets))
        }
        other => panic!("unexpected reason {other}"),
    }
}

#[test]
fn field_array_without_tuple_count() {
    let xml = document(
        "",
        &format!(
            r#"<FieldData><DataArray type="Float64" Name="TimeValue" format="ascii">1</DataArray></FieldData>{TRIANGLE}"#
        ),
    );

    match vtp::parse_polydata(xml.as_bytes()) {
        Err(vtp::Error::Parse(ParseError::FieldData(decode))) => {
            assert_eq!(decode.array_name, "TimeValue");
            assert!(matches!(
                decode.source,
                DecodeError::MissingAttribute("NumberOfTuples")
            ));
        }
        other => panic!("expected a field data error, got {other:?}"),
    }
}

#[test]
fn compressed_binary_data() {
    let xml = document(
        r#"compressor="vtkZLibDataCompressor""#,
        r#"<Piece NumberOfPoints="1">
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="binary">AQAAAAAAAAAMAAAADAAAAA==</DataArray>
      </Points>
    </Piece>"#,
    );

    let err = piece_error(&xml);
    match err.reason {
        Malformed::ArrayDecode(decode) => {
            assert!(matches!(decode.source, DecodeError::UnsupportedCompressor(_)))
        }
        other => panic!("unexpected reason {other}"),
    }
}

#[test]
fn compressed_header_with_ascii_data_is_readable() {
    let xml = document(r#"compressor="vtkZLibDataCompressor""#, TRIANGLE);
    let pieces = vtp::parse_polydata(xml.as_bytes()).unwrap();
    assert_eq!(pieces.len(), 1);
}

#[test]
fn wrong_dataset_type() {
    let xml = r#"<VTKFile type="UnstructuredGrid"><UnstructuredGrid/></VTKFile>"#;
    assert!(matches!(
        vtp::parse_polydata(xml.as_bytes()),
        Err(vtp::Error::Parse(ParseError::Header(_)))
    ));
}

#[test]
fn missing_dataset_element() {
    let xml = r#"<VTKFile type="PolyData"></VTKFile>"#;
    assert!(matches!(
        vtp::parse_polydata(xml.as_bytes()),
        Err(vtp::Error::Parse(ParseError::MissingDataset(_)))
    ));
}

#[test]
fn broken_xml() {
    let xml = r#"<VTKFile type="PolyData"><PolyData></VTKFile>"#;
    assert!(matches!(
        vtp::parse_polydata(xml.as_bytes()),
        Err(vtp::Error::Parse(ParseError::Xml(_)))
    ));
}

#[test]
fn missing_file() {
    assert!(matches!(
        vtp::read_polydata("./static/does_not_exist.vtp"),
        Err(vtp::Error::Io(_))
    ));
}
