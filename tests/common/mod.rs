// 该文件是 Biaozhu （标注） 项目的一部分。
// tests/common/mod.rs - 测试用 HTTP 服务
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use biaozhu::config::RepoConfig;
use url::Url;

#[derive(Debug, Clone)]
pub struct Request {
  pub method: String,
  pub path: String,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

impl Request {
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(n, _)| n.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

type Handler = dyn Fn(&Request) -> (u16, Vec<u8>) + Send + Sync + 'static;

/// 每个连接只处理一个请求的简易 HTTP 服务
pub struct StubServer {
  pub url: Url,
  requests: Arc<Mutex<Vec<Request>>>,
}

impl StubServer {
  pub fn start<F>(handler: F) -> Self
  where
    F: Fn(&Request) -> (u16, Vec<u8>) + Send + Sync + 'static,
  {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler: Arc<Handler> = Arc::new(handler);

    let recorded = requests.clone();
    std::thread::spawn(move || {
      for stream in listener.incoming() {
        let Ok(stream) = stream else { continue };
        serve(stream, handler.as_ref(), &recorded);
      }
    });

    StubServer { url, requests }
  }

  pub fn requests(&self) -> Vec<Request> {
    self.requests.lock().unwrap().clone()
  }
}

// 请求在写回响应之前记录，客户端返回时即可读取
fn serve(mut stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<Request>>) -> Option<()> {
  let mut reader = BufReader::new(stream.try_clone().ok()?);

  let mut line = String::new();
  reader.read_line(&mut line).ok()?;
  let mut parts = line.split_whitespace();
  let method = parts.next()?.to_string();
  let path = parts.next()?.to_string();

  let mut headers = Vec::new();
  loop {
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let line = line.trim_end();
    if line.is_empty() {
      break;
    }
    if let Some((name, value)) = line.split_once(':') {
      headers.push((name.trim().to_string(), value.trim().to_string()));
    }
  }

  let length = headers
    .iter()
    .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
    .and_then(|(_, v)| v.parse::<usize>().ok())
    .unwrap_or(0);
  let mut body = vec![0u8; length];
  reader.read_exact(&mut body).ok()?;

  let request = Request {
    method,
    path,
    headers,
    body,
  };

  let (status, payload) = handler(&request);
  recorded.lock().unwrap().push(request);
  let head = format!(
    "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
    status,
    payload.len()
  );
  stream.write_all(head.as_bytes()).ok()?;
  stream.write_all(&payload).ok()?;
  stream.flush().ok()
}

pub fn repo_config(base_url: &Url) -> RepoConfig {
  RepoConfig {
    user: "alice".to_string(),
    token: "secret".to_string(),
    repo: "pets".to_string(),
    owner: "alice".to_string(),
    base_url: base_url.clone(),
    timeout_secs: Some(10),
  }
}

/// 绑定后立即释放的端口，连接会被拒绝
pub fn closed_url() -> Url {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  Url::parse(&format!("http://{}/", addr)).unwrap()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
  let image = image::RgbImage::new(width, height);
  let mut bytes = std::io::Cursor::new(Vec::new());
  image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
  bytes.into_inner()
}

pub const CAT_DOG_CONFIG: &str = r#"
<View>
  <Image name="Image" value="$image"/>
  <RectangleLabels name="label" toName="Image">
    <Label value="cat"/>
    <Label value="dog"/>
  </RectangleLabels>
</View>"#;
