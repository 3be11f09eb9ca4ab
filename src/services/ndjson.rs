//! # NDJSON 流式帧解码
//!
//! Ollama 的流式响应体是换行分隔的 JSON（每行一个帧）。
//! HTTP 分块的边界与行边界无关：一行可能跨越两个分块，
//! 一个多字节 UTF-8 字符也可能被切开。
//!
//! `FrameDecoder` 持有一个跨分块的未完成行缓冲区：
//! - `push()` 追加新分块，切出所有完整的行并解析
//! - `finish()` 在响应体结束时冲刷剩余的最后一行
//!
//! 空行被丢弃；无法解析为 JSON 的行静默跳过，不会中断流。

use memchr::memchr_iter;

use crate::models::chat::StreamFrame;

/// 跨分块的 NDJSON 帧解码器
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// 尚未遇到换行符的尾部字节
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个分块，返回其中所有完整行解析出的帧（按到达顺序）
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamFrame> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut line_start = 0;
        for newline in memchr_iter(b'\n', &self.pending) {
            if let Some(frame) = parse_line(&self.pending[line_start..newline]) {
                frames.push(frame);
            }
            line_start = newline + 1;
        }

        // 只保留最后一个换行符之后的未完成部分
        self.pending.drain(..line_start);
        frames
    }

    /// 响应体结束：解析缓冲区中没有换行符结尾的最后一行
    pub fn finish(&mut self) -> Option<StreamFrame> {
        let rest = std::mem::take(&mut self.pending);
        parse_line(&rest)
    }

    /// 缓冲区中尚未成行的字节数
    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// 解析单行；空行与非法 JSON 返回 None
fn parse_line(line: &[u8]) -> Option<StreamFrame> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(frame) => Some(frame),
        Err(e) => {
            log::debug!("丢弃无法解析的流式帧 ({} 字节): {}", line.len(), e);
            None
        }
    }
}
