//! Factories for the visitor lifecycle: create/destroy messages and replies.

use std::collections::BTreeMap;

use crate::core::buffer::{ByteBuffer, GrowableByteBuffer};
use crate::error::{ProtocolError, Result};
use crate::protocol::factories::bucket_space::BucketSpaceCodec;
use crate::protocol::factory::{decode_timestamp, encode_timestamp, wrong_variant, RoutableFactory};
use crate::protocol::routable::{
    type_code, BucketId, CreateVisitorMessage, CreateVisitorReply, DestroyVisitorMessage,
    DocumentMessage, DocumentReply, Routable, VisitorStatistics,
};

/// Create-visitor message codec; the bucket space slice is injected.
#[derive(Debug, Clone, Copy)]
pub struct CreateVisitorMessageFactory {
    bucket_space: BucketSpaceCodec,
}

impl CreateVisitorMessageFactory {
    pub fn new(bucket_space: BucketSpaceCodec) -> Self {
        Self { bucket_space }
    }

    fn encode_message(&self, msg: &CreateVisitorMessage, out: &mut GrowableByteBuffer) -> Result<()> {
        out.write_length_prefixed_string(&msg.library_name)?;
        out.write_length_prefixed_string(&msg.instance_id)?;
        out.write_length_prefixed_string(&msg.control_destination)?;
        out.write_length_prefixed_string(&msg.data_destination)?;
        out.write_length_prefixed_string(&msg.document_selection)?;
        out.write_i32(msg.max_pending_reply_count);

        out.write_length(msg.buckets.len())?;
        for bucket in &msg.buckets {
            out.write_i64(bucket.0 as i64);
        }

        encode_timestamp(msg.from_timestamp, out);
        encode_timestamp(msg.to_timestamp, out);
        out.write_bool(msg.visit_removes);
        out.write_length_prefixed_string(&msg.field_set)?;
        out.write_bool(msg.visit_inconsistent_buckets);

        out.write_length(msg.parameters.len())?;
        for (name, value) in &msg.parameters {
            out.write_length_prefixed_string(name)?;
            out.write_length_prefixed_bytes(value)?;
        }

        out.write_i32(msg.max_buckets_per_visitor);
        (self.bucket_space.encode)(&msg.bucket_space, out)
    }

    fn decode_message(&self, input: &mut ByteBuffer<'_>) -> Result<CreateVisitorMessage> {
        let library_name = input.read_length_prefixed_string()?;
        let instance_id = input.read_length_prefixed_string()?;
        let control_destination = input.read_length_prefixed_string()?;
        let data_destination = input.read_length_prefixed_string()?;
        let document_selection = input.read_length_prefixed_string()?;
        let max_pending_reply_count = input.read_i32()?;

        let bucket_count = input.read_length()?;
        // every bucket id takes 8 bytes; don't trust the count for the allocation
        let mut buckets = Vec::with_capacity(bucket_count.min(input.remaining() / 8));
        for _ in 0..bucket_count {
            buckets.push(BucketId(input.read_i64()? as u64));
        }

        let from_timestamp = decode_timestamp(input)?;
        let to_timestamp = decode_timestamp(input)?;
        let visit_removes = input.read_bool()?;
        let field_set = input.read_length_prefixed_string()?;
        let visit_inconsistent_buckets = input.read_bool()?;

        let parameter_count = input.read_length()?;
        let mut parameters = BTreeMap::new();
        for _ in 0..parameter_count {
            let name = input.read_length_prefixed_string()?;
            let value = input.read_length_prefixed_bytes()?.to_vec();
            if parameters.contains_key(&name) {
                return Err(ProtocolError::MalformedValue(format!(
                    "visitor parameter '{name}' occurs more than once"
                )));
            }
            parameters.insert(name, value);
        }

        let max_buckets_per_visitor = input.read_i32()?;
        let bucket_space = (self.bucket_space.decode)(input)?;

        Ok(CreateVisitorMessage {
            library_name,
            instance_id,
            control_destination,
            data_destination,
            document_selection,
            max_pending_reply_count,
            buckets,
            from_timestamp,
            to_timestamp,
            visit_removes,
            field_set,
            visit_inconsistent_buckets,
            parameters,
            max_buckets_per_visitor,
            bucket_space,
        })
    }
}

impl RoutableFactory for CreateVisitorMessageFactory {
    fn name(&self) -> &'static str {
        "CreateVisitorMessageFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::CREATE_VISITOR
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        match routable {
            Routable::Message(DocumentMessage::CreateVisitor(msg)) => self.encode_message(msg, out),
            other => Err(wrong_variant(self.name(), other)),
        }
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        Ok(self.decode_message(input)?.into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DestroyVisitorMessageFactory;

impl RoutableFactory for DestroyVisitorMessageFactory {
    fn name(&self) -> &'static str {
        "DestroyVisitorMessageFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::DESTROY_VISITOR
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        match routable {
            Routable::Message(DocumentMessage::DestroyVisitor(msg)) => {
                out.write_length_prefixed_string(&msg.instance_id)
            }
            other => Err(wrong_variant(self.name(), other)),
        }
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let instance_id = input.read_length_prefixed_string()?;
        Ok(DestroyVisitorMessage { instance_id }.into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreateVisitorReplyFactory;

impl RoutableFactory for CreateVisitorReplyFactory {
    fn name(&self) -> &'static str {
        "CreateVisitorReplyFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::CREATE_VISITOR_REPLY
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        let reply = match routable {
            Routable::Reply(DocumentReply::CreateVisitor(reply)) => reply,
            other => return Err(wrong_variant(self.name(), other)),
        };
        let stats = &reply.statistics;
        out.write_i64(reply.last_bucket.0 as i64);
        out.write_i32(stats.buckets_visited);
        out.write_i64(stats.documents_visited as i64);
        out.write_i64(stats.bytes_visited as i64);
        out.write_i64(stats.documents_returned as i64);
        out.write_i64(stats.bytes_returned as i64);
        Ok(())
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let last_bucket = BucketId(input.read_i64()? as u64);
        let statistics = VisitorStatistics {
            buckets_visited: input.read_i32()?,
            documents_visited: input.read_i64()? as u64,
            bytes_visited: input.read_i64()? as u64,
            documents_returned: input.read_i64()? as u64,
            bytes_returned: input.read_i64()? as u64,
        };
        Ok(CreateVisitorReply {
            last_bucket,
            statistics,
        }
        .into())
    }
}
