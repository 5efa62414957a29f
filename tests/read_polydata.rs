use std::path::PathBuf;
use std::sync::Arc;

use vtp::{AttributeRole, Buffer, TopologyKind};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("static")
        .join(name)
}

fn document(pieces: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<VTKFile type="PolyData" version="0.1" byte_order="LittleEndian">
  <PolyData>
    {pieces}
  </PolyData>
</VTKFile>"#
    )
}

#[test]
fn fixture_pieces() {
    let pieces = vtp::read_polydata(fixture("two_pieces.vtp")).unwrap();
    assert_eq!(pieces.len(), 2);

    let first = &pieces[0];
    assert_eq!(first.num_points(), 4);
    assert_eq!(first.num_cells(), 2);
    assert_eq!(first.polys().as_legacy(), &[3, 0, 1, 2, 3, 0, 2, 3]);
    assert!(first.verts().is_empty());

    let names: Vec<&str> = first.point_data().names().collect();
    assert_eq!(names, vec!["pressure", "velocity"]);
    assert_eq!(
        first.point_data().active(AttributeRole::Vectors).unwrap().components(),
        3
    );
    assert_eq!(
        first.cell_data().get("region").unwrap().values(),
        &Buffer::Int32(vec![7, 8])
    );

    let second = &pieces[1];
    assert_eq!(second.num_points(), 3);
    assert_eq!(second.verts().as_legacy(), &[1, 0]);
    assert_eq!(second.lines().as_legacy(), &[2, 1, 2]);
    assert_eq!(second.num_cells(), 2);
    assert!(second.point_data().active(AttributeRole::Scalars).is_none());
    assert_eq!(
        second.points().unwrap().values(),
        &Buffer::Float64(vec![0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 2.0, 0.0, 1.0])
    );

    // field data is decoded once and shared by both pieces
    for name in ["TimeValue", "Cycle"] {
        let a = first.field_data().shared(name).unwrap();
        let b = second.field_data().shared(name).unwrap();
        assert!(Arc::ptr_eq(a, b));
    }
}

#[test]
fn field_data_changes_stay_in_one_piece() {
    let mut pieces = vtp::read_polydata(fixture("two_pieces.vtp")).unwrap();

    let time = pieces[0].field_data_mut().get_mut("TimeValue").unwrap();
    *time.values_mut() = Buffer::Float64(vec![99.0]);

    assert_eq!(
        pieces[0].field_data().get("TimeValue").unwrap().values(),
        &Buffer::Float64(vec![99.0])
    );
    assert_eq!(
        pieces[1].field_data().get("TimeValue").unwrap().values(),
        &Buffer::Float64(vec![0.25])
    );
}

#[test]
fn only_lines() {
    let xml = document(
        r#"<Piece NumberOfPoints="3" NumberOfLines="2">
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="ascii">0 0 0 1 0 0 2 0 0</DataArray>
      </Points>
      <Lines>
        <DataArray type="Int32" Name="connectivity" format="ascii">0 1 1 2</DataArray>
        <DataArray type="Int32" Name="offsets" format="ascii">2 4</DataArray>
      </Lines>
    </Piece>"#,
    );

    let pieces = vtp::parse_polydata(xml.as_bytes()).unwrap();
    assert_eq!(pieces.len(), 1);

    let piece = &pieces[0];
    assert_eq!(piece.lines().as_legacy(), &[2, 0, 1, 2, 1, 2]);
    for kind in [TopologyKind::Verts, TopologyKind::Strips, TopologyKind::Polys] {
        assert!(piece.cells(kind).is_empty());
    }
    assert!(piece.point_data().is_empty());
    assert!(piece.cell_data().is_empty());
    assert!(piece.field_data().is_empty());
}

#[test]
fn zero_points_skips_point_data() {
    // neither the Points block nor the PointData arrays would decode
    let xml = document(
        r#"<Piece NumberOfPoints="0">
      <Points/>
      <PointData>
        <DataArray type="Float32" Name="broken" format="ascii">not numbers</DataArray>
      </PointData>
    </Piece>"#,
    );

    let pieces = vtp::parse_polydata(xml.as_bytes()).unwrap();
    assert_eq!(pieces.len(), 1);
    assert!(pieces[0].points().is_none());
    assert!(pieces[0].point_data().is_empty());
    assert_eq!(pieces[0].num_cells(), 0);
}

#[test]
fn no_pieces() {
    let pieces = vtp::parse_polydata(document("").as_bytes()).unwrap();
    assert!(pieces.is_empty());
}

#[test]
fn big_endian_inline_binary() {
    let mut block = 24u32.to_be_bytes().to_vec();
    for value in [0.0f64, 1.0, -1.0] {
        block.extend_from_slice(&value.to_be_bytes());
    }

    let xml = format!(
        r#"<VTKFile type="PolyData" byte_order="BigEndian">
  <PolyData>
    <Piece NumberOfPoints="1">
      <Points>
        <DataArray type="Float64" NumberOfComponents="3" format="binary">{}</DataArray>
      </Points>
    </Piece>
  </PolyData>
</VTKFile>"#,
        base64::encode(&block)
    );

    let pieces = vtp::parse_polydata(xml.as_bytes()).unwrap();
    assert_eq!(pieces[0].points().unwrap().tuple(0), Some(vec![0.0, 1.0, -1.0]));
}

#[test]
fn base64_appended_section() {
    // header and values are separate base64 runs
    let mut payload = base64::encode(&12u32.to_le_bytes());
    let points: Vec<u8> = [0.5f32, 1.5, 2.5]
        .iter()
        .flat_map(|value| value.to_le_bytes())
        .collect();
    payload.push_str(&base64::encode(&points));

    let xml = format!(
        r#"<VTKFile type="PolyData">
  <PolyData>
    <Piece NumberOfPoints="1">
      <Points>
        <DataArray type="Float32" NumberOfComponents="3" format="appended" offset="0"/>
      </Points>
    </Piece>
  </PolyData>
  <AppendedData encoding="base64">
    _{payload}
  </AppendedData>
</VTKFile>"#
    );

    let pieces = vtp::parse_polydata(xml.as_bytes()).unwrap();
    assert_eq!(
        pieces[0].points().unwrap().values(),
        &Buffer::Float32(vec![0.5, 1.5, 2.5])
    );
}
