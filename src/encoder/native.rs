// libopusenc backend
//
// Safe wrapper over the `opusenc` bindings. Handles are released by the
// bindings' own `Drop` impls.

use opusenc::{Comments as OpeComments, Encoder, MappingFamily as OpeMappingFamily};

use crate::encoder::{EncoderBackend, PullEncoder};
use crate::error::EncoderError;
use crate::opus::{Comments, MappingFamily, StreamSettings};

impl From<MappingFamily> for OpeMappingFamily {
    fn from(family: MappingFamily) -> Self {
        match family {
            MappingFamily::MonoStereo => OpeMappingFamily::MonoStereo,
            MappingFamily::Surround => OpeMappingFamily::Surround,
        }
    }
}

/// Pull-mode libopusenc encoder
pub struct NativeEncoder {
    inner: Encoder,
}

impl PullEncoder for NativeEncoder {
    fn write(&mut self, pcm: &[i16]) -> Result<(), EncoderError> {
        if pcm.is_empty() {
            return Ok(());
        }
        self.inner.write(pcm)?;
        Ok(())
    }

    fn get_page(&mut self, flush: bool) -> Result<Option<&[u8]>, EncoderError> {
        Ok(self.inner.get_page(flush))
    }

    fn drain(&mut self) -> Result<(), EncoderError> {
        self.inner.drain()?;
        Ok(())
    }
}

/// libopusenc-backed encoder factory
#[derive(Debug, Default, Clone, Copy)]
pub struct OpusEnc;

impl EncoderBackend for OpusEnc {
    type Comments = OpeComments;
    type Encoder = NativeEncoder;

    fn comments(&mut self, comments: &Comments) -> Result<OpeComments, EncoderError> {
        let mut native = OpeComments::create();
        for entry in comments.iter() {
            native.add_string(entry.to_string())?;
        }
        Ok(native)
    }

    fn create_pull(
        &mut self,
        comments: &mut OpeComments,
        settings: &StreamSettings,
    ) -> Result<NativeEncoder, EncoderError> {
        let rate = settings.rate.try_into().map_err(|_| EncoderError::BadArg)?;
        let channels = settings.channels.try_into().map_err(|_| EncoderError::BadArg)?;
        let inner = Encoder::create_pull(comments, rate, channels, settings.family.into())?;
        Ok(NativeEncoder { inner })
    }

    fn name(&self) -> &'static str {
        "libopusenc"
    }
}
