use crate::array::{Buffer, DataArray};
use crate::mesh::{AttributeRole, Attributes, CellArray, PolyData, TopologyKind};
use crate::parse::{
    APPENDED_DATA, CELL_DATA, DATA_ARRAY, FIELD_DATA, NUMBER_OF_POINTS, NUMBER_OF_TUPLES, PIECE,
    POINTS, POINT_DATA, POLY_DATA, VTK_FILE,
};
use crate::Error;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use std::io::Write;

/// the encoding to use for every `DataArray` of a written file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// whitespace separated values inside each element
    Ascii,
    /// base64 encoded binary inside each element
    Base64,
    /// raw binary in a trailing `AppendedData` section
    Appended,
}

impl Encoding {
    fn format(&self) -> &'static str {
        match &self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
            Self::Appended => "appended",
        }
    }
}

/// Write a list of pieces as one `.vtp` document.
///
/// The dataset level `FieldData` is taken from the first piece. Binary data is written
/// little endian with `UInt64` byte count headers.
pub fn write_polydata<W: Write>(writer: W, pieces: &[PolyData], encoding: Encoding) -> Result<(), Error> {
    let mut writer = PolyDataWriter {
        writer: Writer::new_with_indent(writer, b' ', 2),
        encoding,
        appended: Vec::new(),
    };

    writer.write_document(pieces)
}

struct PolyDataWriter<W: Write> {
    writer: Writer<W>,
    encoding: Encoding,
    /// binary blobs queued for the `AppendedData` section
    appended: Vec<u8>,
}

impl<W: Write> PolyDataWriter<W> {
    fn write_document(&mut self, pieces: &[PolyData]) -> Result<(), Error> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

        let vtk_file = BytesStart::new(VTK_FILE).with_attributes([
            ("type", POLY_DATA),
            ("version", "1.0"),
            ("byte_order", "LittleEndian"),
            ("header_type", "UInt64"),
        ]);
        self.writer.write_event(Event::Start(vtk_file))?;
        self.writer
            .write_event(Event::Start(BytesStart::new(POLY_DATA)))?;

        if let Some(first) = pieces.first() {
            self.write_field_data(first.field_data())?;
        }

        for piece in pieces {
            self.write_piece(piece)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(POLY_DATA)))?;

        if self.encoding == Encoding::Appended && !self.appended.is_empty() {
            self.write_appended_section()?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(VTK_FILE)))?;

        Ok(())
    }

    fn write_field_data(&mut self, field: &Attributes) -> Result<(), Error> {
        if field.is_empty() {
            return Ok(());
        }

        self.writer
            .write_event(Event::Start(BytesStart::new(FIELD_DATA)))?;

        for array in field.iter() {
            self.write_array(array.name(), array.components(), array.values(), Some(array.num_tuples()))?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(FIELD_DATA)))?;

        Ok(())
    }

    fn write_piece(&mut self, piece: &PolyData) -> Result<(), Error> {
        let mut start = BytesStart::new(PIECE);
        start.push_attribute((NUMBER_OF_POINTS, piece.num_points().to_string().as_str()));
        for kind in TopologyKind::ALL {
            let count = piece.cells(kind).num_cells().to_string();
            start.push_attribute((kind.count_attribute(), count.as_str()));
        }
        self.writer.write_event(Event::Start(start))?;

        self.write_table(POINT_DATA, piece.point_data())?;
        self.write_table(CELL_DATA, piece.cell_data())?;

        if let Some(points) = piece.points().filter(|points| points.num_tuples() > 0) {
            self.writer.write_event(Event::Start(BytesStart::new(POINTS)))?;
            self.write_data_array(points)?;
            self.writer.write_event(Event::End(BytesEnd::new(POINTS)))?;
        }

        for kind in TopologyKind::ALL {
            self.write_cells(kind, piece.cells(kind))?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(PIECE)))?;

        Ok(())
    }

    /// `PointData` or `CellData`, with the names of the active arrays
    fn write_table(&mut self, tag: &str, table: &Attributes) -> Result<(), Error> {
        if table.is_empty() {
            return Ok(());
        }

        let mut start = BytesStart::new(tag);
        for role in AttributeRole::ALL {
            if let Some(active) = table.active(role) {
                start.push_attribute((role.as_str(), active.name()));
            }
        }
        self.writer.write_event(Event::Start(start))?;

        for array in table.iter() {
            self.write_data_array(array)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;

        Ok(())
    }

    fn write_cells(&mut self, kind: TopologyKind, cells: &CellArray) -> Result<(), Error> {
        if cells.is_empty() {
            return Ok(());
        }

        let (offsets, connectivity) = cells.to_offsets_connectivity();

        self.writer
            .write_event(Event::Start(BytesStart::new(kind.block_name())))?;
        self.write_array("connectivity", 1, &Buffer::from(connectivity), None)?;
        self.write_array("offsets", 1, &Buffer::from(offsets), None)?;
        self.writer
            .write_event(Event::End(BytesEnd::new(kind.block_name())))?;

        Ok(())
    }

    fn write_data_array(&mut self, array: &DataArray) -> Result<(), Error> {
        self.write_array(array.name(), array.components(), array.values(), None)
    }

    fn write_array(
        &mut self,
        name: &str,
        components: usize,
        values: &Buffer,
        tuples: Option<usize>,
    ) -> Result<(), Error> {
        let mut start = BytesStart::new(DATA_ARRAY);
        start.push_attribute(("type", values.scalar_type().as_str()));
        start.push_attribute(("Name", name));
        start.push_attribute(("NumberOfComponents", components.to_string().as_str()));
        if let Some(tuples) = tuples {
            start.push_attribute((NUMBER_OF_TUPLES, tuples.to_string().as_str()));
        }
        start.push_attribute(("format", self.encoding.format()));

        match self.encoding {
            Encoding::Ascii => {
                let data = values.to_ascii();
                self.writer.write_event(Event::Start(start))?;
                self.writer.write_event(Event::Text(BytesText::new(&data)))?;
                self.writer.write_event(Event::End(BytesEnd::new(DATA_ARRAY)))?;
            }
            Encoding::Base64 => {
                let mut bytes = Vec::new();
                push_block(&mut bytes, values);
                let data = base64::encode(&bytes);

                self.writer.write_event(Event::Start(start))?;
                self.writer.write_event(Event::Text(BytesText::new(&data)))?;
                self.writer.write_event(Event::End(BytesEnd::new(DATA_ARRAY)))?;
            }
            Encoding::Appended => {
                start.push_attribute(("offset", self.appended.len().to_string().as_str()));
                push_block(&mut self.appended, values);
                self.writer.write_event(Event::Empty(start))?;
            }
        }

        Ok(())
    }

    fn write_appended_section(&mut self) -> Result<(), Error> {
        let start = BytesStart::new(APPENDED_DATA).with_attributes([("encoding", "raw")]);
        self.writer.write_event(Event::Start(start))?;

        let inner = self.writer.inner();
        inner.write_all(b"_")?;
        inner.write_all(&self.appended)?;
        inner.write_all(b"\n")?;

        self.writer
            .write_event(Event::End(BytesEnd::new(APPENDED_DATA)))?;

        Ok(())
    }
}

/// a `UInt64` byte count followed by the little endian values
fn push_block(out: &mut Vec<u8>, values: &Buffer) {
    out.extend_from_slice(&(values.byte_len() as u64).to_le_bytes());
    values.extend_le_bytes(out);
}
