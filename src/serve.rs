//! 基于行的命令循环
//!
//! 从输入逐行读取 JSON 命令，把每条命令的应答作为一行 JSON 写到输出。
//! 每条命令在当前线程上独立执行，因此翻译进行中收到的 `translate`
//! 会立即得到 busy 应答，`clear` 和 `snapshot` 也不必等待翻译结束。
//!
//! 控制器持有基于 `Rc` 的文档树，命令循环必须运行在 `tokio::task::LocalSet` 中。

use std::io;
use std::rc::Rc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::translation::{Ack, Controller, Request};

/// 运行命令循环，直到输入结束且所有命令都已应答
pub async fn run_command_loop<R, W>(
    controller: Rc<Controller>,
    reader: R,
    mut writer: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Ack>();
    let mut tx = Some(tx);
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line = lines.next_line(), if tx.is_some() => match line? {
                Some(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(tx) = &tx {
                        dispatch(controller.clone(), line, tx.clone());
                    }
                }
                None => {
                    tracing::debug!("输入已结束，等待剩余命令完成");
                    tx = None;
                }
            },
            Some(ack) = rx.recv() => write_ack(&mut writer, &ack).await?,
            else => break,
        }
    }

    Ok(())
}

fn dispatch(controller: Rc<Controller>, line: String, tx: mpsc::UnboundedSender<Ack>) {
    tokio::task::spawn_local(async move {
        let ack = match Request::parse(&line) {
            Ok(request) => {
                tracing::debug!("收到命令: {:?}", request.command);
                controller.handle(request.command).await.with_id(request.id)
            }
            Err(err) => {
                tracing::warn!("无法解析命令: {}", err);
                Ack::failure(&err)
            }
        };

        // 接收端只会在循环退出后关闭
        let _ = tx.send(ack);
    });
}

async fn write_ack<W: AsyncWrite + Unpin>(writer: &mut W, ack: &Ack) -> io::Result<()> {
    let mut line = serde_json::to_vec(ack).map_err(io::Error::other)?;
    line.push(b'\n');

    writer.write_all(&line).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::html_to_dom;
    use crate::translation::{
        TranslationClient, TranslationConfig, TranslationResult, Translator,
    };
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::task::LocalSet;

    struct Slow;

    #[async_trait]
    impl Translator for Slow {
        async fn translate(&self, text: &str, _: &str, target: &str) -> TranslationResult<String> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(format!("{}-{}", text, target.to_uppercase()))
        }

        fn provider_name(&self) -> &str {
            "slow"
        }
    }

    fn controller(html: &str) -> Rc<Controller> {
        let config = TranslationConfig {
            unit_delay_ms: 0,
            ..TranslationConfig::default()
        };
        let client = TranslationClient::new(Box::new(Slow), &config);
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();
        Rc::new(Controller::new(dom, client, config))
    }

    async fn run(controller: Rc<Controller>, input: &str) -> Vec<Ack> {
        let mut output = Vec::new();
        run_command_loop(controller, input.as_bytes(), &mut output)
            .await
            .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_translate_is_rejected_as_busy() {
        let local = LocalSet::new();
        let acks = local
            .run_until(run(
                controller("<p>Hello</p><p>World</p>"),
                "{\"id\":1,\"command\":\"translate\",\"target_lang\":\"es\"}\n\
                 {\"id\":2,\"command\":\"translate\",\"target_lang\":\"fr\"}\n",
            ))
            .await;

        assert_eq!(acks.len(), 2);
        let busy = acks.iter().find(|ack| ack.busy).expect("busy ack");
        assert_eq!(busy.id, Some(serde_json::json!(2)));

        let done = acks.iter().find(|ack| ack.success).expect("success ack");
        assert_eq!(done.id, Some(serde_json::json!(1)));
        assert_eq!(done.report.as_ref().unwrap().rendered, 2);
    }

    #[tokio::test]
    async fn bad_lines_get_failed_acks() {
        let local = LocalSet::new();
        let acks = local
            .run_until(run(controller("<p>Hello</p>"), "nonsense\n\n{\"command\":\"clear\"}\n"))
            .await;

        assert_eq!(acks.len(), 2);
        assert!(acks.iter().any(|ack| !ack.success && ack.error.is_some()));
        assert!(acks.iter().any(|ack| ack.success && ack.cleared == Some(0)));
    }
}
