use byte_writer::ByteWriter;
use common::ClientFeatureSet;

use crate::{error::DatError, FrameGroup};

impl FrameGroup {
    /// Writes the id grid with the id width of `features`. Nothing is written when an id
    /// does not fit.
    pub fn write_sprite_ids(
        &self,
        writer: &mut ByteWriter,
        features: ClientFeatureSet,
    ) -> Result<(), DatError> {
        let max = features.max_sprite_id();

        if let Some(id) = self.sprite_ids().iter().find(|id| **id > max) {
            return Err(DatError::SpriteIdOverflow { id: *id, max });
        }

        if features.uses_extended_ids {
            self.sprite_ids()
                .iter()
                .for_each(|id| writer.append_u32(*id));
        } else {
            self.sprite_ids()
                .iter()
                .for_each(|id| writer.append_u16(*id as u16));
        }

        Ok(())
    }

    pub fn sprite_ids_to_bytes(&self, features: ClientFeatureSet) -> Result<Vec<u8>, DatError> {
        let mut writer =
            ByteWriter::with_capacity(self.sprite_ids().len() * features.sprite_id_width());

        self.write_sprite_ids(&mut writer, features)?;

        Ok(writer.into_bytes())
    }
}
